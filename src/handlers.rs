//! Handlers that control whether values stored in a [`Holdall`] can be
//! cloned.
//!
//! # What Are Handlers?
//!
//! Handlers are types that implement the [`CloneHandler`] trait. They are
//! chosen when a value is stored and decide what happens later when the
//! container is copied:
//! - Whether copying is possible at all (the [`CloneHandler::CLONEABLE`]
//!   constant)
//! - How a new copy is produced ([`CloneHandler::try_clone`])
//! - How an existing value is overwritten by a copy
//!   ([`CloneHandler::try_clone_from`])
//!
//! # Built-in Handlers
//!
//! ## [`Cloneable`]
//!
//! For types implementing [`Clone`]. Copies use [`Clone::clone`], and
//! assignments between containers holding the same type use
//! [`Clone::clone_from`], which lets types like [`Vec`] reuse their
//! allocation. This is the handler used by [`Holdall::from_value`],
//! [`Holdall::emplace`] and [`Holdall::from_pinned_cloneable`]. Pinned
//! values are never assigned through `&mut V`, so copying over one clones a
//! fresh value instead of calling [`Clone::clone_from`].
//!
//! ## [`Uncloneable`]
//!
//! For any type. Every copy attempt fails with
//! [`CopyUnsupported`](crate::CopyUnsupported). This is the handler used by
//! [`Holdall::from_uncloneable`] and [`Holdall::from_pinned`].
//!
//! # Custom Handlers
//!
//! ```
//! use holdall::{
//!     Holdall,
//!     handlers::{CloneHandler, Unsupported},
//! };
//!
//! struct Session {
//!     id: u64,
//!     token: String,
//! }
//!
//! // Copies of a session keep the id but drop the token
//! struct Redacted;
//!
//! impl CloneHandler<Session> for Redacted {
//!     const CLONEABLE: bool = true;
//!
//!     fn try_clone(value: &Session) -> Result<Session, Unsupported> {
//!         Ok(Session {
//!             id: value.id,
//!             token: String::new(),
//!         })
//!     }
//! }
//!
//! let original: Holdall = Holdall::from_custom::<_, Redacted>(Session {
//!     id: 7,
//!     token: "secret".to_string(),
//! });
//! let copy = original.try_clone().unwrap();
//! assert_eq!(copy.downcast_ref::<Session>().unwrap().id, 7);
//! assert!(copy.downcast_ref::<Session>().unwrap().token.is_empty());
//! ```
//!
//! [`Holdall`]: crate::Holdall
//! [`Holdall::from_value`]: crate::Holdall::from_value
//! [`Holdall::emplace`]: crate::Holdall::emplace
//! [`Holdall::from_uncloneable`]: crate::Holdall::from_uncloneable
//! [`Holdall::from_pinned`]: crate::Holdall::from_pinned
//! [`Holdall::from_pinned_cloneable`]: crate::Holdall::from_pinned_cloneable
//! [`Vec`]: alloc::vec::Vec

pub use holdall_internals::handlers::{CloneHandler, Unsupported};

/// Handler for types implementing [`Clone`].
///
/// # Examples
///
/// ```
/// use holdall::{Holdall, handlers};
///
/// let mut a: Holdall = Holdall::from_custom::<_, handlers::Cloneable>(vec![1u32, 2, 3]);
/// let b = a.try_clone().unwrap();
/// assert_eq!(b.downcast_ref::<Vec<u32>>().unwrap(), &[1, 2, 3]);
///
/// a.try_clone_from(&b).unwrap();
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Cloneable;

impl<V> CloneHandler<V> for Cloneable
where
    V: Clone,
{
    const CLONEABLE: bool = true;

    fn try_clone(value: &V) -> Result<V, Unsupported> {
        Ok(value.clone())
    }

    fn try_clone_from(target: &mut V, source: &V) -> Result<(), Unsupported> {
        target.clone_from(source);
        Ok(())
    }
}

/// Handler for values that must never be copied.
///
/// Storing a value with this handler always succeeds. Copying the container
/// afterwards reports [`CopyUnsupported`](crate::CopyUnsupported) and leaves
/// both containers as they were.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
///
/// use holdall::{Holdall, handlers};
///
/// let lock: Holdall = Holdall::from_custom::<_, handlers::Uncloneable>(Mutex::new(0u32));
/// assert!(lock.try_clone().is_err());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Uncloneable;

impl<V> CloneHandler<V> for Uncloneable {
    const CLONEABLE: bool = false;

    fn try_clone(_value: &V) -> Result<V, Unsupported> {
        Err(Unsupported)
    }

    fn try_clone_from(_target: &mut V, _source: &V) -> Result<(), Unsupported> {
        Err(Unsupported)
    }
}
