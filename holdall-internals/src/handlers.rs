//! Handlers that decide how stored values are cloned.
//!
//! A [`RawHoldall`](crate::RawHoldall) accepts values of any `'static` type,
//! including types that cannot be cloned. Whether a stored value can be
//! cloned is decided when it is stored, by choosing a [`CloneHandler`]. The
//! handler is baked into the value's descriptor, so a later attempt to clone
//! the container either succeeds through the handler or reports
//! [`Unsupported`] at that point.

/// Error returned by a [`CloneHandler`] that cannot clone its value.
///
/// This carries no information about the value. The public `holdall` crate
/// attaches the type name before handing the error to users.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Unsupported;

impl core::fmt::Display for Unsupported {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str("cloning is not supported for this value")
    }
}

impl core::error::Error for Unsupported {}

/// Trait for implementing cloning behavior of values stored in a
/// [`RawHoldall`](crate::RawHoldall).
///
/// Handlers are never instantiated. They are only used as type parameters
/// when a value is stored, and the resulting function pointers end up in the
/// value's descriptor.
///
/// # Required Methods
///
/// - [`try_clone`](CloneHandler::try_clone): Creates a new value from an
///   existing one
///
/// # Optional Methods
///
/// - [`try_clone_from`](CloneHandler::try_clone_from): Overwrites an existing
///   value with a copy of another. The default implementation clones and then
///   assigns.
///
/// # Examples
///
/// ```
/// use holdall_internals::handlers::{CloneHandler, Unsupported};
///
/// struct Counter {
///     hits: u32,
/// }
///
/// // Copies reset the hit counter
/// struct ResetOnClone;
///
/// impl CloneHandler<Counter> for ResetOnClone {
///     const CLONEABLE: bool = true;
///
///     fn try_clone(_value: &Counter) -> Result<Counter, Unsupported> {
///         Ok(Counter { hits: 0 })
///     }
/// }
/// ```
pub trait CloneHandler<V>: 'static {
    /// Whether [`try_clone`](CloneHandler::try_clone) can ever succeed.
    ///
    /// Handlers that always return [`Unsupported`] should set this to `false`
    /// so the container can report cloneability without attempting a clone.
    const CLONEABLE: bool;

    /// Creates a copy of `value`.
    fn try_clone(value: &V) -> Result<V, Unsupported>;

    /// Overwrites `target` with a copy of `source`.
    ///
    /// On error `target` must be left untouched.
    fn try_clone_from(target: &mut V, source: &V) -> Result<(), Unsupported> {
        *target = Self::try_clone(source)?;
        Ok(())
    }
}
