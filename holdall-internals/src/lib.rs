#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`holdall`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations that power the [`holdall`] container. A [`RawHoldall`] holds at
//! most one value of any `'static` type, either inline in a two-pointer buffer
//! or behind an owning heap pointer, and dispatches every value-semantic
//! operation through a per-type descriptor.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`holdall`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`holdall`](mod@holdall)**: Type-erased single-value storage
//!   - [`RawHoldall`]: The untyped container: a buffer plus an optional
//!     descriptor reference
//!   - [`Storage`]: The fixed-size, pointer-aligned buffer
//!   - [`Strategy`]: The two ways a value can occupy the buffer, [`Inline`]
//!     and [`External`]
//!   - [`Descriptor`]: Function pointers for type-erased dispatch
//!
//! - **[`handlers`]**: The [`CloneHandler`] trait, which decides whether and
//!   how a stored value can be cloned
//!
//! # Safety Strategy
//!
//! The buffer of a [`RawHoldall`] has no type. Its meaning is entirely
//! determined by the descriptor stored next to it, so the two must never get
//! out of sync. This crate maintains that through:
//!
//! - **Module-based encapsulation**: The fields of [`RawHoldall`] and
//!   [`Descriptor`] are module-private, making invariants locally verifiable
//!   within a single file
//! - **Publish after construct**: A descriptor is only stored after the value
//!   it describes has been completely written into the buffer
//! - **Documented descriptor contracts**: Each descriptor method specifies
//!   exactly when it can be safely called
//!
//! [`holdall`]: https://docs.rs/holdall/latest/holdall/
//! [`Storage`]: holdall::storage::Storage
//! [`Strategy`]: holdall::storage::Strategy
//! [`Inline`]: holdall::storage::Inline
//! [`External`]: holdall::storage::External
//! [`Descriptor`]: holdall::descriptor::Descriptor
//! [`CloneHandler`]: handlers::CloneHandler

extern crate alloc;

pub mod handlers;
mod holdall;
mod util;

pub use holdall::{
    RawHoldall,
    storage::{INLINE_ALIGN, INLINE_CAPACITY, fits_inline},
};
