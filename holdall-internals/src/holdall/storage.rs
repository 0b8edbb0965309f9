//! The fixed-size buffer and the two ways a value can occupy it.
//!
//! A [`Storage`] is a two-pointer buffer with pointer alignment. A value is
//! either written directly into it ([`Inline`]), or moved into a [`Box`] whose
//! raw pointer is written into it ([`External`]). The choice is made per type
//! at compile time: [`fits_inline`] is a `const fn`, so the branch selecting a
//! strategy folds away during monomorphization.
//!
//! Values stored inline move whenever the container moves. Values that must
//! keep their address for their whole life are stored with
//! [`External<true>`](External), which never relocates the value itself, only
//! the pointer to it.

use alloc::boxed::Box;
use core::{
    cell::UnsafeCell,
    mem::{MaybeUninit, align_of, size_of},
    ptr::NonNull,
};

/// The raw layout backing a [`Storage`].
type Words = [*mut (); 2];

/// Number of bytes a value may occupy to be stored inline.
pub const INLINE_CAPACITY: usize = size_of::<Words>();

/// Maximum alignment a value may require to be stored inline.
pub const INLINE_ALIGN: usize = align_of::<Words>();

/// The external strategy stores a single pointer in the buffer.
const _: () = assert!(
    size_of::<NonNull<u8>>() <= INLINE_CAPACITY && align_of::<NonNull<u8>>() <= INLINE_ALIGN
);

/// Returns whether values of type `V` fit into the inline buffer.
///
/// This only considers layout. Values that have been requested to be pinned
/// are always stored externally, regardless of their size.
///
/// # Examples
///
/// ```
/// use holdall_internals::fits_inline;
///
/// assert!(fits_inline::<u64>());
/// assert!(fits_inline::<[usize; 2]>());
/// assert!(!fits_inline::<[usize; 3]>());
/// ```
#[inline]
#[must_use]
pub const fn fits_inline<V>() -> bool {
    size_of::<V>() <= INLINE_CAPACITY && align_of::<V>() <= INLINE_ALIGN
}

/// Fixed-capacity, pointer-aligned buffer with no intrinsic type.
///
/// The buffer lives inside an [`UnsafeCell`] so that values with interior
/// mutability can be stored inline and mutated through shared references.
#[repr(transparent)]
pub(crate) struct Storage(UnsafeCell<MaybeUninit<Words>>);

impl Storage {
    /// Creates a new, uninitialized buffer.
    #[inline]
    pub(crate) const fn uninit() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }

    /// Returns a pointer to the buffer that may be used for reads and, since
    /// the contents live in an [`UnsafeCell`], for writes as well.
    #[inline]
    pub(crate) fn as_ptr(&self) -> NonNull<Storage> {
        NonNull::from(self)
    }
}

/// Placement of a value inside a [`Storage`].
///
/// Each method takes the buffer as a raw pointer. Whether the buffer currently
/// holds a live value of type `V` is tracked by the caller, through the
/// descriptor stored next to it.
pub(crate) trait Strategy: 'static {
    /// Whether values are written directly into the buffer.
    const INLINE: bool;

    /// Whether values keep their address for their entire life.
    const PINNED: bool;

    /// Writes `value` into `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` points to a [`Storage`] that is valid for writes and does
    ///    not currently hold a live value.
    /// 2. If this is the [`Inline`] strategy, [`fits_inline::<V>()`] is true.
    unsafe fn write<V>(storage: NonNull<Storage>, value: V);

    /// Returns a pointer to the live value held by `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` holds a live value of type `V` written with this strategy.
    unsafe fn value_ptr<V>(storage: NonNull<Storage>) -> NonNull<V>;

    /// Drops the value held by `storage`, releasing any allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` holds a live value of type `V` written with this strategy.
    /// 2. The value is treated as gone afterwards: it is not used or dropped
    ///    again.
    unsafe fn drop_value<V>(storage: NonNull<Storage>);

    /// Moves the value out of `storage`, releasing any allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` holds a live value of type `V` written with this strategy.
    /// 2. The value is treated as gone afterwards: it is not used or dropped
    ///    again.
    unsafe fn read<V>(storage: NonNull<Storage>) -> V;

    /// Transfers the value held by `source` into `target`.
    ///
    /// For [`External`] only the owning pointer is transferred, the value
    /// itself does not move.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` holds a live value of type `V` written with this strategy.
    /// 2. `target` is valid for writes and does not hold a live value.
    /// 3. `source` is treated as empty afterwards.
    unsafe fn relocate<V>(source: NonNull<Storage>, target: NonNull<Storage>);
}

/// The value is written directly into the buffer.
pub(crate) struct Inline;

/// The value is moved into a [`Box`] and the buffer holds the owning pointer.
///
/// With `PINNED = true` values are never handed out as `&mut V` or moved out
/// of their allocation, which lets callers build [`Pin`](core::pin::Pin)s on
/// top of the stable address.
pub(crate) struct External<const PINNED: bool>;

impl Strategy for Inline {
    const INLINE: bool = true;
    const PINNED: bool = false;

    #[inline]
    unsafe fn write<V>(storage: NonNull<Storage>, value: V) {
        debug_assert!(fits_inline::<V>());
        let ptr: NonNull<V> = storage.cast::<V>();
        // SAFETY: The buffer is valid for writes and holds no live value, as
        // guaranteed by the caller. The caller also guarantees that `V` fits
        // the size and alignment of the buffer.
        unsafe {
            ptr.write(value);
        }
    }

    #[inline]
    unsafe fn value_ptr<V>(storage: NonNull<Storage>) -> NonNull<V> {
        storage.cast::<V>()
    }

    #[inline]
    unsafe fn drop_value<V>(storage: NonNull<Storage>) {
        let ptr: *mut V = storage.cast::<V>().as_ptr();
        // SAFETY: The buffer holds a live `V` that is not used afterwards, as
        // guaranteed by the caller.
        unsafe {
            core::ptr::drop_in_place(ptr);
        }
    }

    #[inline]
    unsafe fn read<V>(storage: NonNull<Storage>) -> V {
        // SAFETY: The buffer holds a live `V` that is not used afterwards, as
        // guaranteed by the caller, so taking a bitwise copy transfers
        // ownership.
        unsafe { storage.cast::<V>().read() }
    }

    #[inline]
    unsafe fn relocate<V>(source: NonNull<Storage>, target: NonNull<Storage>) {
        // SAFETY: Guaranteed by the caller.
        let value: V = unsafe { Self::read::<V>(source) };
        // SAFETY: `target` is writable and empty as guaranteed by the caller,
        // and `V` fits since it was previously written inline into `source`.
        unsafe {
            Self::write::<V>(target, value);
        }
    }
}

impl<const PINNED: bool> Strategy for External<PINNED> {
    const INLINE: bool = false;
    const PINNED: bool = PINNED;

    #[inline]
    unsafe fn write<V>(storage: NonNull<Storage>, value: V) {
        let ptr: NonNull<V> = NonNull::from(Box::leak(Box::new(value)));
        // SAFETY: The buffer is valid for writes and holds no live value, as
        // guaranteed by the caller. A pointer always fits into the buffer, as
        // checked by the assertions at the top of this module.
        unsafe {
            storage.cast::<NonNull<V>>().write(ptr);
        }
    }

    #[inline]
    unsafe fn value_ptr<V>(storage: NonNull<Storage>) -> NonNull<V> {
        // SAFETY: The buffer holds the pointer written by `write`, as
        // guaranteed by the caller.
        unsafe { storage.cast::<NonNull<V>>().read() }
    }

    #[inline]
    unsafe fn drop_value<V>(storage: NonNull<Storage>) {
        // SAFETY: Guaranteed by the caller.
        let ptr: NonNull<V> = unsafe { Self::value_ptr::<V>(storage) };
        // SAFETY: The pointer was created from a `Box<V>` in `write`, and
        // ownership is transferred to us by the caller.
        let boxed: Box<V> = unsafe { Box::from_raw(ptr.as_ptr()) };
        core::mem::drop(boxed);
    }

    #[inline]
    unsafe fn read<V>(storage: NonNull<Storage>) -> V {
        // SAFETY: Guaranteed by the caller.
        let ptr: NonNull<V> = unsafe { Self::value_ptr::<V>(storage) };
        // SAFETY: The pointer was created from a `Box<V>` in `write`, and
        // ownership is transferred to us by the caller.
        let boxed: Box<V> = unsafe { Box::from_raw(ptr.as_ptr()) };
        *boxed
    }

    #[inline]
    unsafe fn relocate<V>(source: NonNull<Storage>, target: NonNull<Storage>) {
        // SAFETY: Guaranteed by the caller.
        let ptr: NonNull<V> = unsafe { Self::value_ptr::<V>(source) };
        // SAFETY: `target` is writable and empty as guaranteed by the caller.
        // The caller also treats `source` as empty afterwards, so the
        // allocation keeps exactly one owner.
        unsafe {
            target.cast::<NonNull<V>>().write(ptr);
        }
    }
}
