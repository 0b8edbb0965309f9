//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```
//! use holdall::prelude::*;
//!
//! let holdall: Holdall = Holdall::from_value(1.5f64);
//! assert_eq!(any_cast::<f64, _>(&holdall), Ok(&1.5));
//! assert_eq!(holdall.type_token(), TypeToken::of::<f64>());
//! ```
//!
//! # What's Included
//!
//! - **[`Holdall`]**: The container itself
//! - **[`any_cast`]**: The free-function cast
//! - **[`CastError`]** and **[`CopyUnsupported`]**: The errors its
//!   operations can fail with
//! - **[`TypeToken`]**: The identity of a held type
//! - **[`handlers`]** and **[`markers`]**: The modules, for naming clone
//!   handlers and thread-safety markers

pub use crate::{
    CastError, CopyUnsupported, Holdall, TypeToken, any_cast, handlers, markers,
};
