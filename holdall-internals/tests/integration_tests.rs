//! Integration tests for the holdall-internals crate.
//!
//! ## Storage Tests
//! - `test_inline_and_external_values`: values of every strategy can be
//!   stored, inspected and replaced
//! - `test_interior_mutability_inline`: values with interior mutability work
//!   through shared references
//! - `test_emplace_panic_leaves_empty`: a panicking constructor leaves the
//!   container empty
//!
//! ## Clone Tests
//! - `test_clone_unsupported`: an uncloneable handler rejects copies without
//!   touching either container
//! - `test_clone_from_assigns_in_place`: same-descriptor copies use
//!   `try_clone_from`
//! - `test_clone_from_different_type`: different-descriptor copies replace
//!   the value
//! - `test_pinned_clone`: pinned copies get their own allocation, and pinned
//!   assignment replaces the target value
//!
//! ## Failure Tests
//! - `test_move_from_panicking_drop`: a destructor panicking during
//!   `move_from` leaves the target holding the moved value
//! - `test_clone_from_panicking_drop`: a destructor panicking during
//!   `try_clone_from` leaves the target holding the copy
//! - `test_clone_from_panicking_clone`: a panicking `clone_from` leaves both
//!   containers holding valid values
//!
//! ## Memory Management Tests
//! - `test_drop_exactly_once`: every stored value is dropped exactly once
//!   across clear, replace, move and container drop

use std::{
    cell::{Cell, RefCell},
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use holdall_internals::{
    RawHoldall,
    handlers::{CloneHandler, Unsupported},
};

struct AlwaysClone;
impl<V: Clone> CloneHandler<V> for AlwaysClone {
    const CLONEABLE: bool = true;

    fn try_clone(value: &V) -> Result<V, Unsupported> {
        Ok(value.clone())
    }

    fn try_clone_from(target: &mut V, source: &V) -> Result<(), Unsupported> {
        target.clone_from(source);
        Ok(())
    }
}

struct NeverClone;
impl<V> CloneHandler<V> for NeverClone {
    const CLONEABLE: bool = false;

    fn try_clone(_value: &V) -> Result<V, Unsupported> {
        Err(Unsupported)
    }
}

#[derive(Clone)]
struct DropTracker {
    drops: Arc<AtomicUsize>,
}

impl Drop for DropTracker {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Counts calls to `clone_from` so tests can tell assignment from
/// reconstruction.
struct Pooled {
    slot: u32,
    assignments: Rc<Cell<u32>>,
}

impl Clone for Pooled {
    fn clone(&self) -> Self {
        Pooled {
            slot: self.slot,
            assignments: Rc::clone(&self.assignments),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assignments.set(self.assignments.get() + 1);
        self.slot = source.slot;
    }
}

#[test]
fn test_inline_and_external_values() {
    let mut raw = RawHoldall::new();
    assert!(raw.is_empty());
    assert_eq!(raw.type_id(), None);
    assert_eq!(raw.type_name(), None);

    raw.emplace_with::<i32, AlwaysClone, _>(|| 42);
    assert!(!raw.is_empty());
    assert!(raw.is_inline());
    assert_eq!(raw.type_id(), Some(std::any::TypeId::of::<i32>()));
    assert_eq!(raw.type_name(), Some("i32"));
    assert_eq!(raw.downcast_ref::<i32>(), Some(&42));
    assert_eq!(raw.downcast_ref::<f64>(), None);

    *raw.downcast_mut::<i32>().unwrap() += 1;
    assert_eq!(raw.downcast_ref::<i32>(), Some(&43));

    raw.emplace_with::<String, AlwaysClone, _>(|| String::from("external"));
    assert!(!raw.is_inline());
    assert!(raw.is::<String>());
    assert!(!raw.is::<i32>());
    assert_eq!(raw.downcast_ref::<String>().unwrap(), "external");

    assert_eq!(raw.take::<i32>(), None);
    assert_eq!(raw.take::<String>().as_deref(), Some("external"));
    assert!(raw.is_empty());

    raw.clear();
    raw.clear();
    assert!(raw.is_empty());
}

#[test]
fn test_interior_mutability_inline() {
    let mut raw = RawHoldall::new();
    raw.emplace_with::<Cell<u64>, AlwaysClone, _>(|| Cell::new(1));
    assert!(raw.is_inline());

    let shared: &RawHoldall = &raw;
    shared.downcast_ref::<Cell<u64>>().unwrap().set(5);
    assert_eq!(raw.downcast_ref::<Cell<u64>>().unwrap().get(), 5);
}

#[test]
fn test_emplace_panic_leaves_empty() {
    let mut raw = RawHoldall::new();
    raw.emplace_with::<u8, AlwaysClone, _>(|| 1);

    let result = catch_unwind(AssertUnwindSafe(|| {
        raw.emplace_with::<u16, AlwaysClone, _>(|| panic!("constructor failed"));
    }));
    assert!(result.is_err());
    assert!(raw.is_empty());
    assert_eq!(raw.downcast_ref::<u8>(), None);
    assert_eq!(raw.downcast_ref::<u16>(), None);
}

#[test]
fn test_clone_unsupported() {
    let mut source = RawHoldall::new();
    source.emplace_with::<String, NeverClone, _>(|| String::from("mine"));
    assert!(!source.is_cloneable());
    assert_eq!(source.try_clone().err(), Some(Unsupported));

    let mut target = RawHoldall::new();
    target.emplace_with::<u32, AlwaysClone, _>(|| 3);
    assert_eq!(target.try_clone_from(&source), Err(Unsupported));

    assert_eq!(target.downcast_ref::<u32>(), Some(&3));
    assert_eq!(source.downcast_ref::<String>().unwrap(), "mine");

    let mut same = RawHoldall::new();
    same.emplace_with::<String, NeverClone, _>(|| String::from("other"));
    assert_eq!(same.try_clone_from(&source), Err(Unsupported));
    assert_eq!(same.downcast_ref::<String>().unwrap(), "other");
}

#[test]
fn test_clone_from_assigns_in_place() {
    let assignments = Rc::new(Cell::new(0));
    let mut source = RawHoldall::new();
    source.emplace_with::<Pooled, AlwaysClone, _>(|| Pooled {
        slot: 1,
        assignments: Rc::clone(&assignments),
    });
    let mut target = RawHoldall::new();
    target.emplace_with::<Pooled, AlwaysClone, _>(|| Pooled {
        slot: 2,
        assignments: Rc::clone(&assignments),
    });
    let before: *const Pooled = target.downcast_ref::<Pooled>().unwrap();

    target.try_clone_from(&source).unwrap();

    let after: *const Pooled = target.downcast_ref::<Pooled>().unwrap();
    assert_eq!(assignments.get(), 1);
    assert_eq!(before, after);
    assert_eq!(target.downcast_ref::<Pooled>().unwrap().slot, 1);
}

#[test]
fn test_clone_from_different_type() {
    let mut source = RawHoldall::new();
    source.emplace_with::<Vec<u32>, AlwaysClone, _>(|| vec![1, 2]);
    let mut target = RawHoldall::new();
    target.emplace_with::<u8, AlwaysClone, _>(|| 8);

    target.try_clone_from(&source).unwrap();
    assert_eq!(target.downcast_ref::<Vec<u32>>().unwrap(), &[1, 2]);
    assert_eq!(source.downcast_ref::<Vec<u32>>().unwrap(), &[1, 2]);

    let empty = RawHoldall::new();
    target.try_clone_from(&empty).unwrap();
    assert!(target.is_empty());
}

#[test]
fn test_drop_exactly_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let tracker = || DropTracker {
        drops: Arc::clone(&drops),
    };

    let mut raw = RawHoldall::new();
    raw.emplace_with::<DropTracker, AlwaysClone, _>(tracker);
    assert!(raw.is_inline());
    raw.clear();
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    raw.emplace_with::<DropTracker, AlwaysClone, _>(tracker);
    raw.emplace_with::<u8, AlwaysClone, _>(|| 0);
    assert_eq!(drops.load(Ordering::SeqCst), 2);

    let _ = raw.emplace_pinned_with::<DropTracker, AlwaysClone, _>(tracker);
    let mut other = RawHoldall::new();
    other.move_from(&mut raw);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
    drop(raw);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
    drop(other);
    assert_eq!(drops.load(Ordering::SeqCst), 3);

    let mut source = RawHoldall::new();
    source.emplace_with::<DropTracker, AlwaysClone, _>(tracker);
    let clone = source.try_clone().unwrap();
    drop(source);
    assert_eq!(drops.load(Ordering::SeqCst), 4);
    drop(clone);
    assert_eq!(drops.load(Ordering::SeqCst), 5);
}

/// Records its id when dropped, then panics if asked to.
///
/// `PAD` grows the value past the inline buffer.
#[derive(Clone)]
struct PanicOnDrop<const PAD: usize> {
    id: u32,
    panics: bool,
    drops: Rc<RefCell<Vec<u32>>>,
    _pad: [u64; PAD],
}

impl<const PAD: usize> PanicOnDrop<PAD> {
    fn new(id: u32, panics: bool, drops: &Rc<RefCell<Vec<u32>>>) -> Self {
        PanicOnDrop {
            id,
            panics,
            drops: Rc::clone(drops),
            _pad: [0; PAD],
        }
    }
}

impl<const PAD: usize> Drop for PanicOnDrop<PAD> {
    fn drop(&mut self) {
        let id = self.id;
        self.drops.borrow_mut().push(id);
        if self.panics {
            panic!("destructor of {id} failed");
        }
    }
}

fn store<const PAD: usize>(raw: &mut RawHoldall, value: PanicOnDrop<PAD>, pinned: bool) {
    if pinned {
        let _ = raw.emplace_pinned_with::<_, AlwaysClone, _>(|| value);
    } else {
        raw.emplace_with::<_, AlwaysClone, _>(|| value);
    }
}

fn held_id<const PAD: usize>(raw: &RawHoldall) -> Option<u32> {
    raw.downcast_ref::<PanicOnDrop<PAD>>().map(|value| value.id)
}

#[test]
fn test_pinned_clone() {
    let drops = Rc::new(RefCell::new(Vec::new()));
    let mut source = RawHoldall::new();
    store(&mut source, PanicOnDrop::<0>::new(1, false, &drops), true);
    assert!(source.is_pinned());
    assert!(source.is_cloneable());

    let copy = source.try_clone().unwrap();
    assert!(copy.is_pinned());
    assert!(copy.same_descriptor(&source));
    let original: *const PanicOnDrop<0> = source.downcast_ref::<PanicOnDrop<0>>().unwrap();
    let copied: *const PanicOnDrop<0> = copy.downcast_ref::<PanicOnDrop<0>>().unwrap();
    assert_ne!(original, copied);

    let mut target = RawHoldall::new();
    store(&mut target, PanicOnDrop::<0>::new(2, false, &drops), true);
    target.try_clone_from(&source).unwrap();
    assert_eq!(*drops.borrow(), [2]);
    assert_eq!(held_id::<0>(&target), Some(1));
    assert!(target.is_pinned());

    drop((source, copy, target));
    assert_eq!(*drops.borrow(), [2, 1, 1, 1]);
}

fn check_move_from_panicking_drop<const PAD: usize>(pinned: bool) {
    let drops = Rc::new(RefCell::new(Vec::new()));
    let mut target = RawHoldall::new();
    let mut source = RawHoldall::new();
    store(&mut target, PanicOnDrop::<PAD>::new(1, true, &drops), pinned);
    store(&mut source, PanicOnDrop::<PAD>::new(2, false, &drops), pinned);
    assert!(target.same_descriptor(&source));

    let result = catch_unwind(AssertUnwindSafe(|| target.move_from(&mut source)));
    assert!(result.is_err());
    assert_eq!(*drops.borrow(), [1]);
    assert!(source.is_empty());
    assert_eq!(held_id::<PAD>(&target), Some(2));

    drop(source);
    drop(target);
    assert_eq!(*drops.borrow(), [1, 2]);
}

#[test]
fn test_move_from_panicking_drop() {
    check_move_from_panicking_drop::<0>(false);
    check_move_from_panicking_drop::<4>(false);
    check_move_from_panicking_drop::<0>(true);

    // Different descriptors
    let drops = Rc::new(RefCell::new(Vec::new()));
    let mut target = RawHoldall::new();
    store(&mut target, PanicOnDrop::<4>::new(1, true, &drops), false);
    let mut source = RawHoldall::new();
    source.emplace_with::<String, AlwaysClone, _>(|| String::from("moved"));

    let result = catch_unwind(AssertUnwindSafe(|| target.move_from(&mut source)));
    assert!(result.is_err());
    assert_eq!(*drops.borrow(), [1]);
    assert!(source.is_empty());
    assert_eq!(target.downcast_ref::<String>().unwrap(), "moved");
}

fn check_clone_from_panicking_drop<const PAD: usize>(pinned: bool) {
    let drops = Rc::new(RefCell::new(Vec::new()));
    let mut target = RawHoldall::new();
    let mut source = RawHoldall::new();
    store(&mut target, PanicOnDrop::<PAD>::new(1, true, &drops), pinned);
    store(&mut source, PanicOnDrop::<PAD>::new(2, false, &drops), pinned);

    let result = catch_unwind(AssertUnwindSafe(|| target.try_clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(*drops.borrow(), [1]);
    assert_eq!(held_id::<PAD>(&source), Some(2));
    assert_eq!(held_id::<PAD>(&target), Some(2));

    drop(source);
    drop(target);
    assert_eq!(*drops.borrow(), [1, 2, 2]);
}

#[test]
fn test_clone_from_panicking_drop() {
    check_clone_from_panicking_drop::<0>(false);
    check_clone_from_panicking_drop::<4>(false);
    check_clone_from_panicking_drop::<0>(true);

    // Different descriptors
    let drops = Rc::new(RefCell::new(Vec::new()));
    let mut target = RawHoldall::new();
    store(&mut target, PanicOnDrop::<0>::new(1, true, &drops), false);
    let mut source = RawHoldall::new();
    source.emplace_with::<String, AlwaysClone, _>(|| String::from("copied"));

    let result = catch_unwind(AssertUnwindSafe(|| target.try_clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(*drops.borrow(), [1]);
    assert_eq!(target.downcast_ref::<String>().unwrap(), "copied");
    assert_eq!(source.downcast_ref::<String>().unwrap(), "copied");
}

/// A value whose `clone_from` panics halfway through.
struct HalfAssigned {
    parts: [u32; 2],
    drops: Rc<Cell<u32>>,
}

impl Clone for HalfAssigned {
    fn clone(&self) -> Self {
        HalfAssigned {
            parts: self.parts,
            drops: Rc::clone(&self.drops),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.parts[0] = source.parts[0];
        panic!("assignment failed");
    }
}

impl Drop for HalfAssigned {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_clone_from_panicking_clone() {
    let drops = Rc::new(Cell::new(0));
    let mut source = RawHoldall::new();
    source.emplace_with::<HalfAssigned, AlwaysClone, _>(|| HalfAssigned {
        parts: [1, 1],
        drops: Rc::clone(&drops),
    });
    let mut target = RawHoldall::new();
    target.emplace_with::<HalfAssigned, AlwaysClone, _>(|| HalfAssigned {
        parts: [2, 2],
        drops: Rc::clone(&drops),
    });

    let result = catch_unwind(AssertUnwindSafe(|| target.try_clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(drops.get(), 0);
    assert_eq!(target.downcast_ref::<HalfAssigned>().unwrap().parts, [1, 2]);
    assert_eq!(source.downcast_ref::<HalfAssigned>().unwrap().parts, [1, 1]);

    drop(source);
    drop(target);
    assert_eq!(drops.get(), 2);
}
