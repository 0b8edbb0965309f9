//! Descriptor for type-erased value operations.
//!
//! This module contains the [`Descriptor`] which enables destroying, cloning
//! and moving the value held by a [`Storage`] when its concrete type `V`, its
//! clone handler `H` and its storage strategy `S` have been erased. The
//! descriptor stores function pointers that dispatch to the correct typed
//! implementations.
//!
//! This module encapsulates the fields of [`Descriptor`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the descriptor's type parameters must match the actual value,
//! handler and strategy used to fill the [`Storage`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because descriptors are created as `&'static`
//! references via [`Descriptor::new`], which pairs the function pointers with
//! specific types `V`, `H` and `S` at compile time.
//!
//! # Identity
//!
//! Every call to [`Descriptor::new`] with the same type parameters usually
//! yields the same static instance, but separately compiled parts of a program
//! are not guaranteed to share it. Address comparison is therefore only a fast
//! path; [`Descriptor::same_as`] and [`Descriptor::is`] fall back to comparing
//! [`TypeId`]s.

use core::{any::TypeId, ptr::NonNull};

use crate::{
    handlers::{CloneHandler, Unsupported},
    holdall::storage::{Storage, Strategy},
    util::Erased,
};

/// Descriptor for type-erased value operations.
///
/// Contains function pointers for performing operations on a stored value
/// without knowing its concrete type at compile time.
///
/// # Safety Invariant
///
/// The function pointer fields are guaranteed to point to the functions
/// defined below instantiated with the value type `V`, handler type `H` and
/// strategy `S` that were used to create this [`Descriptor`], and the flags
/// are guaranteed to be the ones of `H` and `S`.
pub(crate) struct Descriptor {
    /// Gets the [`TypeId`] of the value type.
    type_id: fn() -> TypeId,
    /// Gets the name of the value type.
    type_name: fn() -> &'static str,
    /// Gets the [`TypeId`] of the clone handler.
    handler_type_id: fn() -> TypeId,
    /// Whether the value lives directly in the buffer.
    inline: bool,
    /// Whether the value has a stable address.
    pinned: bool,
    /// Whether the clone handler supports cloning at all.
    cloneable: bool,
    /// Drops the value held by a buffer.
    drop: unsafe fn(NonNull<Storage>),
    /// Locates the value held by a buffer.
    value_ptr: unsafe fn(NonNull<Storage>) -> NonNull<Erased>,
    /// Clones the value held by a buffer into an empty buffer.
    clone_construct: unsafe fn(NonNull<Storage>, NonNull<Storage>) -> Result<(), Unsupported>,
    /// Clones the value held by a buffer over the value held by another.
    clone_assign: unsafe fn(NonNull<Storage>, NonNull<Storage>) -> Result<(), Unsupported>,
    /// Moves the value held by a buffer into an empty buffer.
    move_construct: unsafe fn(NonNull<Storage>, NonNull<Storage>),
    /// Moves the value held by a buffer over the value held by another.
    move_assign: unsafe fn(NonNull<Storage>, NonNull<Storage>),
    /// Moves the value held by a buffer into an uninitialized slot.
    move_out: unsafe fn(NonNull<Storage>, NonNull<Erased>),
}

impl Descriptor {
    /// Creates a new [`Descriptor`] for the value type `V`, the clone handler
    /// `H` and the storage strategy `S`.
    pub(super) const fn new<V: 'static, H: CloneHandler<V>, S: Strategy>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<V>,
                type_name: core::any::type_name::<V>,
                handler_type_id: TypeId::of::<H>,
                inline: S::INLINE,
                pinned: S::PINNED,
                cloneable: H::CLONEABLE,
                drop: drop::<V, S>,
                value_ptr: value_ptr::<V, S>,
                clone_construct: clone_construct::<V, H, S>,
                clone_assign: clone_assign::<V, H, S>,
                move_construct: move_construct::<V, S>,
                move_assign: move_assign::<V, S>,
                move_out: move_out::<V, S>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`Descriptor`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the name of the value type that was used to create this
    /// [`Descriptor`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Gets the [`TypeId`] of the clone handler that was used to create this
    /// [`Descriptor`].
    #[inline]
    pub(super) fn handler_type_id(&self) -> TypeId {
        (self.handler_type_id)()
    }

    /// Whether values described by this [`Descriptor`] live inline.
    #[inline]
    pub(super) fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether values described by this [`Descriptor`] have a stable address.
    #[inline]
    pub(super) fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Whether values described by this [`Descriptor`] can be cloned.
    #[inline]
    pub(super) fn is_cloneable(&self) -> bool {
        self.cloneable
    }

    /// Returns whether this [`Descriptor`] describes values of type `V`.
    ///
    /// The function pointer comparison is a fast path only: identical
    /// `TypeId::of::<V>` instantiations always return the same id, even when
    /// they do not share an address.
    #[inline]
    pub(super) fn is<V: 'static>(&self) -> bool {
        core::ptr::fn_addr_eq(self.type_id, TypeId::of::<V> as fn() -> TypeId)
            || self.type_id() == TypeId::of::<V>()
    }

    /// Returns whether `self` and `other` were created with the same type
    /// parameters, and can therefore operate on each other's buffers.
    #[inline]
    pub(super) fn same_as(&'static self, other: &'static Descriptor) -> bool {
        core::ptr::eq(self, other)
            || (self.type_id() == other.type_id()
                && self.handler_type_id() == other.handler_type_id()
                && self.inline == other.inline
                && self.pinned == other.pinned)
    }

    /// Drops the value held by `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` holds a live value described by this [`Descriptor`].
    /// 2. The buffer is treated as empty afterwards.
    #[inline]
    pub(super) unsafe fn drop(&self, storage: NonNull<Storage>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<V, S>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.drop)(storage);
        }
    }

    /// Returns a pointer to the value held by `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` holds a live value described by this [`Descriptor`].
    #[inline]
    pub(super) unsafe fn value_ptr(&self, storage: NonNull<Storage>) -> NonNull<Erased> {
        // SAFETY: We know that `self.value_ptr` points to the function
        // `value_ptr::<V, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.value_ptr)(storage) }
    }

    /// Clones the value held by `source` into `target`.
    ///
    /// On error `target` is left untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` holds a live value described by this [`Descriptor`].
    /// 2. `target` is valid for writes and does not hold a live value.
    #[inline]
    pub(super) unsafe fn clone_construct(
        &self,
        source: NonNull<Storage>,
        target: NonNull<Storage>,
    ) -> Result<(), Unsupported> {
        // SAFETY: We know that `self.clone_construct` points to the function
        // `clone_construct::<V, H, S>` below. That function's safety
        // requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_construct)(source, target) }
    }

    /// Clones the value held by `source` over the value held by `target`.
    ///
    /// On error both buffers are left untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` and `target` both hold live values described by this
    ///    [`Descriptor`], and they are distinct buffers.
    /// 2. `target` is valid for writes.
    #[inline]
    pub(super) unsafe fn clone_assign(
        &self,
        source: NonNull<Storage>,
        target: NonNull<Storage>,
    ) -> Result<(), Unsupported> {
        // SAFETY: We know that `self.clone_assign` points to the function
        // `clone_assign::<V, H, S>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_assign)(source, target) }
    }

    /// Moves the value held by `source` into `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` holds a live value described by this [`Descriptor`].
    /// 2. `target` is valid for writes and does not hold a live value.
    /// 3. `source` is treated as empty afterwards.
    #[inline]
    pub(super) unsafe fn move_construct(&self, source: NonNull<Storage>, target: NonNull<Storage>) {
        // SAFETY: We know that `self.move_construct` points to the function
        // `move_construct::<V, S>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.move_construct)(source, target);
        }
    }

    /// Moves the value held by `source` over the value held by `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` and `target` both hold live values described by this
    ///    [`Descriptor`], and they are distinct buffers.
    /// 2. `target` is valid for writes.
    /// 3. `source` is treated as empty afterwards.
    #[inline]
    pub(super) unsafe fn move_assign(&self, source: NonNull<Storage>, target: NonNull<Storage>) {
        // SAFETY: We know that `self.move_assign` points to the function
        // `move_assign::<V, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.move_assign)(source, target);
        }
    }

    /// Moves the value held by `source` into the uninitialized `slot`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` holds a live value described by this [`Descriptor`].
    /// 2. `slot` is valid for writes of the described value type.
    /// 3. `source` is treated as empty afterwards.
    #[inline]
    pub(super) unsafe fn move_out(&self, source: NonNull<Storage>, slot: NonNull<Erased>) {
        // SAFETY: We know that `self.move_out` points to the function
        // `move_out::<V, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.move_out)(source, slot);
        }
    }
}

/// Drops the `V` held by `storage`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `storage` holds a live `V` written with strategy `S`.
/// 2. The buffer is treated as empty afterwards.
unsafe fn drop<V: 'static, S: Strategy>(storage: NonNull<Storage>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe {
        S::drop_value::<V>(storage);
    }
}

/// Returns a pointer to the `V` held by `storage`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `storage` holds a live `V` written with strategy `S`.
unsafe fn value_ptr<V: 'static, S: Strategy>(storage: NonNull<Storage>) -> NonNull<Erased> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let ptr: NonNull<V> = unsafe { S::value_ptr::<V>(storage) };
    ptr.cast::<Erased>()
}

/// Clones the `V` held by `source` into `target` using the handler `H`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` holds a live `V` written with strategy `S`.
/// 2. `target` is valid for writes and does not hold a live value.
unsafe fn clone_construct<V: 'static, H: CloneHandler<V>, S: Strategy>(
    source: NonNull<Storage>,
    target: NonNull<Storage>,
) -> Result<(), Unsupported> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let source: NonNull<V> = unsafe { S::value_ptr::<V>(source) };
    // SAFETY: The pointer refers to a live `V`, and no mutable access exists
    // while the caller holds the source buffer.
    let source: &V = unsafe { source.as_ref() };
    let value = H::try_clone(source)?;
    // SAFETY:
    // 1. `target` is writable and empty, as guaranteed by the caller.
    // 2. `S` is the strategy this descriptor was created with, so `V` fits if
    //    `S` is `Inline`.
    unsafe {
        S::write::<V>(target, value);
    }
    Ok(())
}

/// Clones the `V` held by `source` over the `V` held by `target` using the
/// handler `H`.
///
/// Unpinned values go through [`CloneHandler::try_clone_from`], keeping
/// assignment semantics. Pinned values are never exposed as `&mut V`, so a
/// fresh clone is boxed and replaces the target, which is dropped last.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` and `target` both hold live `V`s written with strategy `S`,
///    and they are distinct buffers.
unsafe fn clone_assign<V: 'static, H: CloneHandler<V>, S: Strategy>(
    source: NonNull<Storage>,
    target: NonNull<Storage>,
) -> Result<(), Unsupported> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let source: NonNull<V> = unsafe { S::value_ptr::<V>(source) };
    // SAFETY: The pointer refers to a live `V`, and it does not alias `target`.
    let source: &V = unsafe { source.as_ref() };

    if S::PINNED {
        let value = H::try_clone(source)?;
        let fresh = Storage::uninit();
        // SAFETY: `fresh` is a new buffer holding no value.
        unsafe {
            S::write::<V>(fresh.as_ptr(), value);
        }
        // SAFETY:
        // 1. `target` holds a live `V` and `fresh` holds the clone.
        // 2. `fresh` is a local buffer that is not used afterwards.
        unsafe {
            replace::<V, S>(fresh.as_ptr(), target);
        }
        Ok(())
    } else {
        // SAFETY:
        // 1. Guaranteed by the caller
        let mut target: NonNull<V> = unsafe { S::value_ptr::<V>(target) };
        // SAFETY: The pointer refers to a live, unpinned `V` that does not
        // alias `source`, and the caller has exclusive access to `target`.
        let target: &mut V = unsafe { target.as_mut() };
        H::try_clone_from(target, source)
    }
}

/// Moves the `V` held by `source` into `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` holds a live `V` written with strategy `S`.
/// 2. `target` is valid for writes and does not hold a live value.
/// 3. `source` is treated as empty afterwards.
unsafe fn move_construct<V: 'static, S: Strategy>(
    source: NonNull<Storage>,
    target: NonNull<Storage>,
) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller
    unsafe {
        S::relocate::<V>(source, target);
    }
}

/// Moves the `V` held by `source` over the `V` held by `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` and `target` both hold live `V`s written with strategy `S`,
///    and they are distinct buffers.
/// 2. `source` is treated as empty afterwards.
unsafe fn move_assign<V: 'static, S: Strategy>(source: NonNull<Storage>, target: NonNull<Storage>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe {
        replace::<V, S>(source, target);
    }
}

/// Moves the `V` held by `source` into `target`, then drops the `V` that
/// `target` held before.
///
/// The old value is relocated into a scratch buffer before the new one moves
/// in, so `target` holds a live `V` at every point a destructor can run. If
/// the old value's destructor panics, `target` already holds the new value.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` and `target` both hold live `V`s written with strategy `S`,
///    and they are distinct buffers.
/// 2. `source` is treated as empty afterwards.
unsafe fn replace<V: 'static, S: Strategy>(source: NonNull<Storage>, target: NonNull<Storage>) {
    let previous = Storage::uninit();
    // SAFETY: `target` holds a live `V` and `previous` is a new buffer. The
    // value is moved back into place on the next line, before anything can
    // observe `target`.
    unsafe {
        S::relocate::<V>(target, previous.as_ptr());
    }
    // SAFETY: `source` holds a live `V`, `target` was emptied just above, and
    // the caller treats `source` as empty afterwards.
    unsafe {
        S::relocate::<V>(source, target);
    }
    // SAFETY: `previous` holds the old value and is a local buffer that is
    // never read again. `Storage` has no destructor of its own.
    unsafe {
        S::drop_value::<V>(previous.as_ptr());
    }
}

/// Moves the `V` held by `source` into `slot`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` holds a live `V` written with strategy `S`.
/// 2. `slot` is valid for writes of a `V`.
/// 3. `source` is treated as empty afterwards.
unsafe fn move_out<V: 'static, S: Strategy>(source: NonNull<Storage>, slot: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller, `source` is treated as empty afterwards
    let value: V = unsafe { S::read::<V>(source) };
    // SAFETY: `slot` is valid for writes of a `V`, as guaranteed by the caller.
    unsafe {
        slot.cast::<V>().write(value);
    }
}
