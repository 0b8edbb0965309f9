//! The two ways an operation on a [`Holdall`](crate::Holdall) can fail.
//!
//! - [`CastError`]: the requested type does not match the held value, or the
//!   requested kind of access is not available for it. Only returned by the
//!   `cast_*` family; the `downcast_*` family reports the same situations as
//!   `None`.
//! - [`CopyUnsupported`]: a copy was attempted of a value stored with a
//!   handler that cannot clone it.
//!
//! After either error the container is unchanged.

use derive_more::{Display, Error};

/// Error returned when a [`Holdall`](crate::Holdall) can not be accessed as
/// the requested type.
///
/// # Examples
///
/// ```
/// use holdall::{CastError, Holdall};
///
/// let holdall: Holdall = Holdall::from_value(3u8);
/// assert_eq!(
///     holdall.cast_ref::<u16>(),
///     Err(CastError::Mismatch {
///         expected: "u16",
///         found: "u8",
///     })
/// );
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
pub enum CastError {
    /// The container holds no value.
    #[display("cannot cast an empty holdall to `{expected}`")]
    Empty {
        /// Name of the requested type
        expected: &'static str,
    },
    /// The container holds a value of another type.
    #[display("cannot cast a holdall holding `{found}` to `{expected}`")]
    Mismatch {
        /// Name of the requested type
        expected: &'static str,
        /// Name of the held type
        found: &'static str,
    },
    /// The held value is pinned, so it can not be moved out or borrowed as
    /// `&mut`.
    #[display("the `{found}` held by this holdall is pinned and can only be accessed through `Pin`")]
    Pinned {
        /// Name of the held type
        found: &'static str,
    },
    /// Pinned access was requested for a value that was not stored pinned.
    #[display("the `{found}` held by this holdall was not stored pinned")]
    NotPinned {
        /// Name of the held type
        found: &'static str,
    },
}

impl CastError {
    /// Returns the name of the held type, or `None` if the container was
    /// empty.
    #[must_use]
    pub fn found(&self) -> Option<&'static str> {
        match *self {
            CastError::Empty { .. } => None,
            CastError::Mismatch { found, .. }
            | CastError::Pinned { found }
            | CastError::NotPinned { found } => Some(found),
        }
    }
}

/// Error returned when copying a [`Holdall`](crate::Holdall) whose value can
/// not be cloned.
///
/// # Examples
///
/// ```
/// use holdall::Holdall;
///
/// struct Handle(u32);
///
/// let holdall: Holdall = Holdall::from_uncloneable(Handle(1));
/// let error = holdall.try_clone().unwrap_err();
/// assert!(error.type_name().ends_with("Handle"));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display("values of type `{type_name}` can not be copied")]
pub struct CopyUnsupported {
    /// Name of the held type
    type_name: &'static str,
}

impl CopyUnsupported {
    /// Creates a new [`CopyUnsupported`] for the named type.
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self { type_name }
    }

    /// Returns the name of the type that could not be copied.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
