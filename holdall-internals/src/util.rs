//! Internal utility types.

/// Marker type used when type-erasing a stored value.
///
/// This zero-sized type serves as a placeholder in pointer types when the
/// actual concrete type has been erased. For example, a `NonNull<Erased>`
/// returned by a descriptor points to a value whose concrete type is unknown
/// at the current scope.
pub(crate) struct Erased;
