//! Cross-thread use of `Holdall<SendSync>`.
//!
//! - `test_send_to_worker`: containers move between threads
//! - `test_shared_reads`: containers are readable from many threads at once
//! - `test_concurrent_first_use`: many threads store the same new type at once

use std::{
    sync::{Arc, Barrier, mpsc},
    thread,
};

use holdall::{Holdall, TypeToken};

#[test]
fn test_send_to_worker() {
    let (sender, receiver) = mpsc::channel::<Holdall>();
    let worker = thread::spawn(move || {
        receiver
            .into_iter()
            .map(|mut holdall| {
                if let Some(text) = holdall.downcast_mut::<String>() {
                    text.make_ascii_uppercase();
                }
                holdall
            })
            .collect::<Vec<_>>()
    });

    sender.send(Holdall::from_value(String::from("loud"))).unwrap();
    sender.send(Holdall::from_value(3u8)).unwrap();
    drop(sender);

    let results = worker.join().unwrap();
    assert_eq!(results[0].downcast_ref::<String>().unwrap(), "LOUD");
    assert_eq!(results[1].downcast_ref::<u8>(), Some(&3));
}

#[test]
fn test_shared_reads() {
    let holdall: Arc<Holdall> = Arc::new(Holdall::from_value(vec![1u64, 2, 3]));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let holdall = Arc::clone(&holdall);
            thread::spawn(move || holdall.downcast_ref::<Vec<u64>>().map(|v| v.iter().sum::<u64>()))
        })
        .collect();

    for reader in readers {
        assert_eq!(reader.join().unwrap(), Some(6));
    }
}

#[test]
fn test_concurrent_first_use() {
    #[derive(Clone)]
    struct FirstUse([u32; 16]);

    let barrier = Arc::new(Barrier::new(8));
    let workers: Vec<_> = (0..8u32)
        .map(|index| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let holdall: Holdall = Holdall::from_value(FirstUse([index; 16]));
                let copy = holdall.try_clone().unwrap();
                (copy.type_token(), copy.downcast_ref::<FirstUse>().map(|v| v.0[0]))
            })
        })
        .collect();

    for (index, worker) in workers.into_iter().enumerate() {
        let (token, first) = worker.join().unwrap();
        assert_eq!(token, TypeToken::of::<FirstUse>());
        assert_eq!(first, Some(index as u32));
    }
}
