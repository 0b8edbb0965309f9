//! Marker types and traits for defining thread-safety semantics.
//!
//! A [`Holdall<T>`](crate::Holdall) carries a thread-safety marker as its
//! type parameter, which decides what can be stored in it and whether the
//! container itself can cross thread boundaries:
//!
//! - [`SendSync`]: Only `Send + Sync` values can be stored, and the container
//!   is `Send + Sync` as well. This is the default.
//! - [`Local`]: Any `'static` value can be stored, including `Rc` and raw
//!   pointers, but the container is neither `Send` nor `Sync`.
//!
//! # Design Philosophy
//!
//! The constraint encoded by the marker is enforced when a value is stored.
//! It is impossible to place a non-`Send` value into a `Holdall<SendSync>`,
//! so you can trust that a `Holdall<SendSync>` truly is `Send + Sync`.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use holdall::{Holdall, markers};
//!
//! // Thread-safe container with a String (String is Send + Sync)
//! let payload: Holdall<markers::SendSync> = Holdall::from_value(String::from("hello"));
//! std::thread::spawn(move || {
//!     assert_eq!(payload.downcast_ref::<String>().unwrap(), "hello");
//! })
//! .join()
//! .unwrap();
//!
//! // Local container with an Rc (Rc is !Send + !Sync)
//! let shared: Holdall<markers::Local> = Holdall::from_value(Rc::new(5u8));
//! // shared cannot be sent to another thread - won't compile
//! ```

/// Marker type indicating that a [`Holdall`](crate::Holdall) and its value
/// are `Send + Sync`.
///
/// This is the default thread-safety marker.
///
/// # Examples
///
/// ```
/// use holdall::{Holdall, markers::SendSync};
///
/// let holdall: Holdall<SendSync> = Holdall::from_value(vec![1u8, 2, 3]);
/// let handle = std::thread::spawn(move || holdall.downcast_ref::<Vec<u8>>().map(Vec::len));
/// assert_eq!(handle.join().unwrap(), Some(3));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that a [`Holdall`](crate::Holdall) may hold values
/// that are not `Send` or `Sync`.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use holdall::{Holdall, markers::Local};
///
/// let log = Rc::new(RefCell::new(Vec::<String>::new()));
/// let holdall: Holdall<Local> = Holdall::from_value(Rc::clone(&log));
///
/// holdall
///     .downcast_ref::<Rc<RefCell<Vec<String>>>>()
///     .unwrap()
///     .borrow_mut()
///     .push("entry".to_string());
/// assert_eq!(log.borrow().len(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

mod sealed_payload_marker {
    use super::*;

    pub trait Sealed<T>: 'static {}

    impl<V: 'static> Sealed<Local> for V {}
    impl<V: 'static + Send + Sync> Sealed<SendSync> for V {}
}

/// Marker trait for values that may be stored in a
/// [`Holdall<T>`](crate::Holdall).
///
/// This trait is implemented for:
/// - All `'static` types when `T = Local`
/// - All `'static + Send + Sync` types when `T = SendSync`
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait PayloadMarkerFor<T>: sealed_payload_marker::Sealed<T> + Sized + 'static {}

impl<V: 'static> PayloadMarkerFor<Local> for V {}
impl<V: 'static + Send + Sync> PayloadMarkerFor<SendSync> for V {}
