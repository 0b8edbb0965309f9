//! Plugin parameters with copy-on-write defaults.
//!
//! This example demonstrates:
//! 1. Keeping a template of default parameters of mixed types
//! 2. Copying the template per plugin instance with `try_clone_from`
//! 3. Storing an uncloneable resource and handling `CopyUnsupported`
//! 4. Pinning a value that must not move

use std::{collections::BTreeMap, marker::PhantomPinned};

use holdall::{CopyUnsupported, Holdall};

type Parameters = BTreeMap<&'static str, Holdall>;

/// Something a plugin may not share between instances.
struct DeviceHandle {
    id: u32,
}

/// A buffer registered with a device by address.
struct DmaBuffer {
    bytes: [u8; 64],
    _pin: PhantomPinned,
}

fn defaults() -> Parameters {
    let mut parameters = Parameters::new();
    parameters.insert("gain", Holdall::from_value(1.0f32));
    parameters.insert("label", Holdall::from_value(String::from("untitled")));
    parameters.insert("taps", Holdall::from_value(vec![0.25f32; 8]));
    parameters
}

/// Overwrites `target` with copies of every parameter in `source`.
fn apply(target: &mut Parameters, source: &Parameters) -> Result<(), CopyUnsupported> {
    for (name, value) in source {
        target.entry(*name).or_default().try_clone_from(value)?;
    }
    Ok(())
}

fn describe(parameters: &Parameters) {
    for (name, value) in parameters {
        println!(
            "  {name}: {} (inline: {}, pinned: {}, cloneable: {})",
            value.type_token(),
            value.is_inline(),
            value.is_pinned(),
            value.is_cloneable()
        );
    }
}

fn main() {
    println!("=== Plugin Parameters ===\n");

    let template = defaults();

    // Each instance starts from the template and changes what it needs
    let mut reverb = Parameters::new();
    if let Err(error) = apply(&mut reverb, &template) {
        println!("could not copy defaults: {error}");
        return;
    }
    if let Some(gain) = reverb.get_mut("gain").and_then(Holdall::downcast_mut::<f32>) {
        *gain = 0.8;
    }
    reverb.insert("device", Holdall::from_uncloneable(DeviceHandle { id: 7 }));
    reverb.insert(
        "dma",
        Holdall::from_pinned(DmaBuffer {
            bytes: [0; 64],
            _pin: PhantomPinned,
        }),
    );

    println!("reverb:");
    describe(&reverb);

    // Resetting to defaults reuses the existing storage where types match
    if let Err(error) = apply(&mut reverb, &template) {
        println!("could not reset: {error}");
    }
    println!("\nreverb after reset:");
    describe(&reverb);

    // The device handle stops a full copy of the instance
    let mut copy = Parameters::new();
    match apply(&mut copy, &reverb) {
        Ok(()) => println!("\ncopied every parameter"),
        Err(error) => println!("\ncopy stopped: {error}"),
    }

    if let Some(device) = reverb.get("device").and_then(Holdall::downcast_ref::<DeviceHandle>) {
        println!("device {} is still owned by reverb", device.id);
    }
    if let Some(dma) = reverb.get("dma").and_then(Holdall::downcast_ref::<DmaBuffer>) {
        println!("dma buffer of {} bytes at {:p}", dma.bytes.len(), dma);
    }
}
