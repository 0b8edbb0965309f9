//! The [`any_cast`] free function.
//!
//! [`any_cast`] forwards to the casting methods of [`Holdall`], picking the
//! method from the kind of access it is handed:
//!
//! | source                    | forwards to               | output                      |
//! |---------------------------|---------------------------|-----------------------------|
//! | `&Holdall<T>`             | [`Holdall::cast_ref`]     | `Result<&V, CastError>`     |
//! | `&mut Holdall<T>`         | [`Holdall::cast_mut`]     | `Result<&mut V, CastError>` |
//! | `Holdall<T>`              | [`Holdall::take`]         | `Result<V, CastError>`      |
//! | `Option<&Holdall<T>>`     | [`Holdall::downcast_ref`] | `Option<&V>`                |
//! | `Option<&mut Holdall<T>>` | [`Holdall::downcast_mut`] | `Option<&mut V>`            |
//!
//! The reference and by-value forms report failures as a [`CastError`]. The
//! `Option` forms never fail, and give `None` both for a missing container
//! and for a mismatched one.

use crate::{Holdall, error::CastError};

mod sealed_cast_source {
    use crate::Holdall;

    pub trait Sealed {}

    impl<T> Sealed for &Holdall<T> {}
    impl<T> Sealed for &mut Holdall<T> {}
    impl<T> Sealed for Holdall<T> {}
    impl<T> Sealed for Option<&Holdall<T>> {}
    impl<T> Sealed for Option<&mut Holdall<T>> {}
}

/// Something a value of type `V` can be cast out of with [`any_cast`].
///
/// This trait is sealed, and implemented for shared and mutable references to
/// a [`Holdall`], for an owned [`Holdall`], and for optional references.
pub trait CastSource<V: 'static>: sealed_cast_source::Sealed {
    /// The result of the cast.
    type Output;

    /// Casts the held value to `V`.
    fn any_cast(self) -> Self::Output;
}

impl<'a, V: 'static, T> CastSource<V> for &'a Holdall<T> {
    type Output = Result<&'a V, CastError>;

    fn any_cast(self) -> Self::Output {
        self.cast_ref::<V>()
    }
}

impl<'a, V: 'static, T> CastSource<V> for &'a mut Holdall<T> {
    type Output = Result<&'a mut V, CastError>;

    fn any_cast(self) -> Self::Output {
        self.cast_mut::<V>()
    }
}

impl<V: 'static, T> CastSource<V> for Holdall<T> {
    type Output = Result<V, CastError>;

    fn any_cast(mut self) -> Self::Output {
        self.take::<V>()
    }
}

impl<'a, V: 'static, T> CastSource<V> for Option<&'a Holdall<T>> {
    type Output = Option<&'a V>;

    fn any_cast(self) -> Self::Output {
        self?.downcast_ref::<V>()
    }
}

impl<'a, V: 'static, T> CastSource<V> for Option<&'a mut Holdall<T>> {
    type Output = Option<&'a mut V>;

    fn any_cast(self) -> Self::Output {
        self?.downcast_mut::<V>()
    }
}

/// Casts the value held by `source` to `V`.
///
/// Shared and mutable references fail with a [`CastError`], an owned
/// container gives up its value, and optional references give `None` instead
/// of an error. See [`CastSource`] for the implementations.
///
/// # Examples
///
/// ```
/// use holdall::{CastError, Holdall, any_cast};
///
/// let mut holdall: Holdall = Holdall::from_value(String::from("hello"));
///
/// // References fail with a `CastError`
/// assert_eq!(any_cast::<String, _>(&holdall).unwrap(), "hello");
/// assert!(matches!(
///     any_cast::<u32, _>(&holdall),
///     Err(CastError::Mismatch { .. })
/// ));
/// any_cast::<String, _>(&mut holdall).unwrap().push_str(", world");
///
/// // Optional references give `None`
/// assert_eq!(any_cast::<u32, _>(Some(&holdall)), None);
/// assert_eq!(any_cast::<String, _>(None::<&Holdall>), None);
///
/// // An owned container gives up its value
/// let text = any_cast::<String, _>(holdall).unwrap();
/// assert_eq!(text, "hello, world");
/// ```
pub fn any_cast<V, S>(source: S) -> S::Output
where
    V: 'static,
    S: CastSource<V>,
{
    source.any_cast()
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;

    #[test]
    fn test_reference_forms() {
        let mut holdall: Holdall = Holdall::from_value(vec![1u8, 2]);
        assert_eq!(any_cast::<Vec<u8>, _>(&holdall), Ok(&vec![1, 2]));

        any_cast::<Vec<u8>, _>(&mut holdall).unwrap().push(3);
        assert_eq!(holdall.downcast_ref::<Vec<u8>>().unwrap(), &[1, 2, 3]);

        assert_eq!(
            any_cast::<String, _>(&mut holdall).err().and_then(|e| e.found()),
            Some(core::any::type_name::<Vec<u8>>())
        );
    }

    #[test]
    fn test_option_forms() {
        let mut holdall: Holdall = Holdall::from_value(4i16);
        assert_eq!(any_cast::<i16, _>(Some(&holdall)), Some(&4));
        assert_eq!(any_cast::<i32, _>(Some(&holdall)), None);

        if let Some(value) = any_cast::<i16, _>(Some(&mut holdall)) {
            *value += 1;
        }
        assert_eq!(holdall.downcast_ref::<i16>(), Some(&5));
        assert_eq!(any_cast::<i16, _>(None::<&mut Holdall>), None);
    }

    #[test]
    fn test_by_value_form() {
        let holdall: Holdall = Holdall::new();
        assert_eq!(
            any_cast::<u8, _>(holdall),
            Err(CastError::Empty { expected: "u8" })
        );

        let holdall: Holdall = Holdall::from_pinned(1u8);
        assert_eq!(
            any_cast::<u8, _>(holdall),
            Err(CastError::Pinned { found: "u8" })
        );

        let holdall: Holdall = Holdall::from_value(String::from("owned"));
        assert_eq!(any_cast::<String, _>(holdall).unwrap(), "owned");
    }

    #[test]
    fn test_pinned_mutable_form() {
        let mut holdall: Holdall = Holdall::from_pinned(1u8);
        assert_eq!(any_cast::<u8, _>(&holdall), Ok(&1));
        assert!(any_cast::<u8, _>(&mut holdall).is_err());
        assert_eq!(any_cast::<u8, _>(Some(&mut holdall)), None);
    }
}
