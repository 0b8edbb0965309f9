//! Comparable type identities.

use core::any::TypeId;

/// Uninhabited type standing in for "no value". It is private, so no
/// container can ever hold it.
enum Nothing {}

/// The identity of the type held by a [`Holdall`](crate::Holdall).
///
/// Two tokens are equal if and only if they name the same type. The type
/// name is carried along for diagnostics only and takes no part in
/// comparisons.
///
/// An empty container reports [`TypeToken::none`], which differs from the
/// token of every storable type.
///
/// # Examples
///
/// ```
/// use holdall::{Holdall, TypeToken};
///
/// let mut holdall: Holdall = Holdall::from_value(1i32);
/// assert_eq!(holdall.type_token(), TypeToken::of::<i32>());
///
/// holdall.clear();
/// assert_eq!(holdall.type_token(), TypeToken::none());
/// assert!(holdall.type_token().is_none());
/// ```
#[derive(Copy, Clone, Debug)]
pub struct TypeToken {
    /// The identity of the type
    id: TypeId,
    /// The name of the type
    name: &'static str,
}

impl TypeToken {
    /// Returns the token for the type `V`.
    #[must_use]
    pub fn of<V: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: core::any::type_name::<V>(),
        }
    }

    /// Returns the token reported by empty containers.
    #[must_use]
    pub fn none() -> Self {
        Self {
            id: TypeId::of::<Nothing>(),
            name: "<none>",
        }
    }

    /// Creates a token from a raw type identity and name.
    pub(crate) fn from_parts(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Returns `true` if this is the token reported by empty containers.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.id == TypeId::of::<Nothing>()
    }

    /// Returns `true` if this token names the type `V`.
    #[must_use]
    pub fn is<V: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<V>()
    }

    /// Returns the [`TypeId`] of the named type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the type, as given by [`core::any::type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl core::hash::Hash for TypeToken {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Display for TypeToken {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str(self.name)
    }
}
