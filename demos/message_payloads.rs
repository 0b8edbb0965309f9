//! Message passing with type-erased payloads.
//!
//! This example demonstrates:
//! 1. Sending `Holdall` payloads of different types over one channel
//! 2. Dispatching on the payload type with `is` and `any_cast`
//! 3. Taking ownership of a payload with `take`

use std::{sync::mpsc, thread};

use holdall::{CastError, Holdall, any_cast};

#[derive(Clone, Debug)]
struct Resize {
    width: u32,
    height: u32,
}

#[derive(Clone, Debug)]
struct Frame {
    pixels: Vec<u8>,
}

/// A message carries a topic and a payload of any type.
struct Message {
    topic: &'static str,
    payload: Holdall,
}

/// Handles one message, or explains why its payload was not understood.
fn handle(mut message: Message) -> Result<String, CastError> {
    match message.topic {
        "resize" => {
            let resize = any_cast::<Resize, _>(&message.payload)?;
            Ok(format!("resizing to {}x{}", resize.width, resize.height))
        }
        "frame" => {
            // The frame buffer is moved out, not copied
            let frame = message.payload.take::<Frame>()?;
            Ok(format!("rendering {} bytes", frame.pixels.len()))
        }
        _ if message.payload.is::<String>() => Ok(format!(
            "note on {}: {}",
            message.topic,
            any_cast::<String, _>(&message.payload)?
        )),
        _ => Ok(format!("ignoring {:?}", message.payload)),
    }
}

fn main() {
    println!("=== Message Payloads ===\n");

    let (sender, receiver) = mpsc::channel::<Message>();
    let worker = thread::spawn(move || {
        for message in receiver {
            match handle(message) {
                Ok(outcome) => println!("{outcome}"),
                Err(error) => println!("rejected: {error}"),
            }
        }
    });

    let messages = [
        Message {
            topic: "resize",
            payload: Holdall::from_value(Resize {
                width: 800,
                height: 600,
            }),
        },
        Message {
            topic: "frame",
            payload: Holdall::from_value(Frame {
                pixels: vec![0; 4096],
            }),
        },
        Message {
            topic: "status",
            payload: Holdall::from_value(String::from("all systems nominal")),
        },
        // The wrong payload for its topic
        Message {
            topic: "resize",
            payload: Holdall::from_value(42u64),
        },
        Message {
            topic: "heartbeat",
            payload: Holdall::new(),
        },
    ];

    for message in messages {
        if sender.send(message).is_err() {
            break;
        }
    }
    drop(sender);

    if worker.join().is_err() {
        println!("worker panicked");
    }
}
