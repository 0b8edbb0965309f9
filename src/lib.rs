#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A value-semantic container for a single value of any type.
//!
//! ## Overview
//!
//! A [`Holdall`] holds at most one value of any `'static` type. It can be
//! inspected for the type it holds, cast back to that type, copied when the
//! value allows it, and moved around like any other Rust value. It is the
//! building block for heterogeneous collections, message payloads and plugin
//! parameters, where the set of types is not known up front.
//!
//! ```
//! use holdall::Holdall;
//!
//! let mut holdall: Holdall = Holdall::from_value(42u32);
//! assert!(holdall.is::<u32>());
//! assert_eq!(holdall.downcast_ref::<u32>(), Some(&42));
//!
//! holdall.emplace(String::from("replaced"));
//! assert_eq!(holdall.downcast_ref::<String>().unwrap(), "replaced");
//! assert_eq!(holdall.downcast_ref::<u32>(), None);
//! ```
//!
//! ## Storage
//!
//! The container is three pointers wide. Two of them form an inline buffer:
//! values that fit in it (see [`fits_inline`]) live there directly and never
//! allocate. Larger or over-aligned values are boxed and the buffer keeps the
//! pointer. The choice is made per type at compile time, and is visible
//! through [`Holdall::is_inline`].
//!
//! Values stored with [`Holdall::from_pinned`] are always boxed, keep their
//! address until they are destroyed, and are only handed out as [`Pin`].
//! Pinned values may still be cloneable
//! ([`Holdall::from_pinned_cloneable`]): a copy gets its own allocation.
//!
//! ## Copying
//!
//! Rust has no runtime notion of [`Clone`], so whether a value can be copied
//! is decided when it is stored, by the [handler](handlers) it is stored
//! with:
//!
//! - [`Holdall::from_value`] and [`Holdall::emplace`] require `V: Clone`;
//!   copies of the container copy the value.
//! - [`Holdall::from_uncloneable`] accepts anything; copies fail with
//!   [`CopyUnsupported`].
//! - [`Holdall::from_custom`] takes any [`CloneHandler`](handlers::CloneHandler).
//!
//! ```
//! use holdall::Holdall;
//!
//! let cloneable: Holdall = Holdall::from_value(vec![1, 2, 3]);
//! assert!(cloneable.try_clone().is_ok());
//!
//! let uncloneable: Holdall = Holdall::from_uncloneable(std::sync::Mutex::new(0));
//! assert!(uncloneable.try_clone().is_err());
//! ```
//!
//! ## Casting
//!
//! The `downcast_*` methods return `None` on a mismatch, the `cast_*` methods
//! and [`Holdall::take`] return a [`CastError`]. The [`any_cast`] free
//! function forwards to them depending on the kind of access it is given.
//!
//! ## Thread Safety
//!
//! `Holdall` defaults to [`Holdall<SendSync>`](markers::SendSync), which only
//! accepts `Send + Sync` values and is itself `Send + Sync`. Use
//! [`Holdall<Local>`](markers::Local) to store values like `Rc`.
//!
//! ## Features
//!
//! - `tracing`: emit [`tracing`](https://docs.rs/tracing) events under the
//!   `holdall` target when values are stored or cleared, and when a cast or
//!   copy is rejected.
//!
//! [`Pin`]: core::pin::Pin

extern crate alloc;

mod trace;

pub mod handlers;
pub mod markers;
pub mod prelude;

mod cast;
mod error;
mod holdall;
mod type_token;

pub use holdall_internals::{INLINE_ALIGN, INLINE_CAPACITY, fits_inline};

pub use self::{
    cast::{CastSource, any_cast},
    error::{CastError, CopyUnsupported},
    holdall::Holdall,
    type_token::TypeToken,
};
