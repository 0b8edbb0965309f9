//! The untyped single-value container.
//!
//! This module encapsulates the `storage` and `descriptor` fields of
//! [`RawHoldall`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **`descriptor` is
//! `Some` if and only if `storage` holds a live value, and the descriptor
//! describes exactly that value**.
//!
//! # Safety Invariant
//!
//! Every method that fills the buffer writes the value first and only then
//! publishes its descriptor, and every method that empties the buffer retracts
//! the descriptor before anything else can observe the buffer. A panic while
//! producing a value therefore leaves the container empty, never half
//! initialized.
//!
//! Assignments that replace a held value drop the old value only after the
//! new one is in place and described. A panicking destructor therefore leaves
//! the container holding the new value.
//!
//! # Type Erasure
//!
//! The buffer has no type of its own. Casting back to a concrete type is only
//! done after checking the descriptor with [`Descriptor::is`].

use core::{any::TypeId, mem::MaybeUninit, pin::Pin, ptr::NonNull};

use crate::{
    handlers::{CloneHandler, Unsupported},
    holdall::{
        descriptor::Descriptor,
        storage::{External, Inline, Storage, Strategy, fits_inline},
    },
    util::Erased,
};

/// A container holding at most one value of any `'static` type.
///
/// Small values that fit into two pointers are stored inline, larger or
/// over-aligned values are boxed, and values requested to be pinned are
/// always boxed so their address never changes.
///
/// This type is neither `Send` nor `Sync`. The public `holdall` crate adds
/// those when it can prove that the held value allows it.
pub struct RawHoldall {
    /// The buffer holding the value or the pointer to it
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `descriptor` is `Some(d)`, the buffer holds exactly one live value
    ///    of the type, and written with the strategy, that `d` describes.
    /// 2. If `descriptor` is `None`, the buffer holds no live value.
    storage: Storage,
    /// The descriptor of the held value, if any
    descriptor: Option<&'static Descriptor>,
}

impl RawHoldall {
    /// Creates a new, empty [`RawHoldall`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: Storage::uninit(),
            descriptor: None,
        }
    }

    /// Returns `true` if no value is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptor.is_none()
    }

    /// Returns the [`TypeId`] of the held value.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.descriptor.map(Descriptor::type_id)
    }

    /// Returns the type name of the held value.
    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        self.descriptor.map(Descriptor::type_name)
    }

    /// Returns the [`TypeId`] of the clone handler the held value was stored
    /// with.
    #[inline]
    pub fn handler_type_id(&self) -> Option<TypeId> {
        self.descriptor.map(Descriptor::handler_type_id)
    }

    /// Returns `true` if a value is held directly in the inline buffer.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.descriptor.is_some_and(Descriptor::is_inline)
    }

    /// Returns `true` if a value is held in pinned storage.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.descriptor.is_some_and(Descriptor::is_pinned)
    }

    /// Returns `true` if a value is held and its handler supports cloning.
    #[inline]
    pub fn is_cloneable(&self) -> bool {
        self.descriptor.is_some_and(Descriptor::is_cloneable)
    }

    /// Returns `true` if a value of type `V` is held.
    #[inline]
    pub fn is<V: 'static>(&self) -> bool {
        self.descriptor.is_some_and(Descriptor::is::<V>)
    }

    /// Returns `true` if both containers hold values stored the same way, so
    /// assignments between them can happen in place.
    #[inline]
    pub fn same_descriptor(&self, other: &RawHoldall) -> bool {
        match (self.descriptor, other.descriptor) {
            (Some(a), Some(b)) => a.same_as(b),
            _ => false,
        }
    }

    /// Destroys the held value, if any.
    ///
    /// Calling this on an empty container does nothing.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(descriptor) = self.descriptor.take() {
            let storage = NonNull::from(&mut self.storage);
            // SAFETY:
            // 1. The descriptor was `Some`, so the buffer holds the value it
            //    describes.
            // 2. The descriptor has already been retracted, so the buffer is
            //    treated as empty from now on.
            unsafe {
                descriptor.drop(storage);
            }
        }
    }

    /// Replaces the held value with the one returned by `make`, and returns a
    /// reference to it.
    ///
    /// The previous value is destroyed before `make` runs. If `make` panics
    /// the container is left empty.
    ///
    /// The value is stored inline if [`fits_inline::<V>()`](fits_inline) and
    /// boxed otherwise.
    #[inline]
    pub fn emplace_with<V, H, F>(&mut self, make: F) -> &mut V
    where
        V: 'static,
        H: CloneHandler<V>,
        F: FnOnce() -> V,
    {
        let mut ptr = if fits_inline::<V>() {
            self.construct::<V, H, Inline, F>(make)
        } else {
            self.construct::<V, H, External<false>, F>(make)
        };

        // SAFETY: `construct` returns a pointer to the value it just stored.
        // The value is unpinned, and the returned reference borrows `self`
        // mutably, so no other access can happen while it is alive.
        unsafe { ptr.as_mut() }
    }

    /// Replaces the held value with the one returned by `make`, and returns a
    /// pinned reference to it.
    ///
    /// The value is always boxed, and keeps its address until it is destroyed
    /// even when the container moves. Pinned values are never handed out as
    /// `&mut V` and can not be moved out again.
    #[inline]
    pub fn emplace_pinned_with<V, H, F>(&mut self, make: F) -> Pin<&mut V>
    where
        V: 'static,
        H: CloneHandler<V>,
        F: FnOnce() -> V,
    {
        let mut ptr = self.construct::<V, H, External<true>, F>(make);

        // SAFETY: `construct` returns a pointer to the value it just stored,
        // and the returned reference borrows `self` mutably.
        let value: &mut V = unsafe { ptr.as_mut() };
        // SAFETY: The value lives in a pinned allocation that is only freed
        // when the value is dropped, and no API hands out an unpinned `&mut V`
        // or moves the value out of that allocation.
        unsafe { Pin::new_unchecked(value) }
    }

    /// Destroys the held value, then stores the value returned by `make`
    /// using the strategy `S`.
    fn construct<V, H, S, F>(&mut self, make: F) -> NonNull<V>
    where
        V: 'static,
        H: CloneHandler<V>,
        S: Strategy,
        F: FnOnce() -> V,
    {
        self.clear();
        let value = make();

        let storage = NonNull::from(&mut self.storage);
        // SAFETY:
        // 1. The container was just cleared, so the buffer holds no value.
        // 2. `S` is only `Inline` when `fits_inline::<V>()` holds.
        unsafe {
            S::write::<V>(storage, value);
        }
        // The value is complete, so it is now safe to publish its descriptor.
        self.descriptor = Some(Descriptor::new::<V, H, S>());

        // SAFETY: The buffer holds the `V` just written with strategy `S`.
        unsafe { S::value_ptr::<V>(storage) }
    }

    /// Returns a pointer to the held value if it is of type `V`.
    #[inline]
    fn value_ptr<V: 'static>(&self) -> Option<NonNull<V>> {
        let descriptor = self.descriptor.filter(|descriptor| descriptor.is::<V>())?;
        // SAFETY: The descriptor is `Some`, so it describes the live value in
        // the buffer.
        let ptr: NonNull<Erased> = unsafe { descriptor.value_ptr(self.storage.as_ptr()) };
        Some(ptr.cast::<V>())
    }

    /// Returns a reference to the held value if it is of type `V`.
    ///
    /// This works for pinned values too.
    #[inline]
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        let ptr = self.value_ptr::<V>()?;
        // SAFETY: The descriptor confirmed that the value is a `V`, and the
        // reference borrows `self`, so the value outlives it.
        Some(unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the held value if it is of type `V`
    /// and not pinned.
    #[inline]
    pub fn downcast_mut<V: 'static>(&mut self) -> Option<&mut V> {
        if self.is_pinned() {
            return None;
        }
        let mut ptr = self.value_ptr::<V>()?;
        // SAFETY: The descriptor confirmed that the value is an unpinned `V`,
        // and the reference borrows `self` mutably.
        Some(unsafe { ptr.as_mut() })
    }

    /// Returns a pinned mutable reference to the held value if it is of type
    /// `V` and was stored pinned.
    #[inline]
    pub fn downcast_pin_mut<V: 'static>(&mut self) -> Option<Pin<&mut V>> {
        if !self.is_pinned() {
            return None;
        }
        let mut ptr = self.value_ptr::<V>()?;
        // SAFETY: The descriptor confirmed that the value is a `V`, and the
        // reference borrows `self` mutably.
        let value: &mut V = unsafe { ptr.as_mut() };
        // SAFETY: Pinned values are boxed and never move until dropped.
        Some(unsafe { Pin::new_unchecked(value) })
    }

    /// Moves the held value out if it is of type `V` and not pinned, leaving
    /// the container empty.
    ///
    /// Returns `None`, leaving the container unchanged, otherwise.
    #[inline]
    pub fn take<V: 'static>(&mut self) -> Option<V> {
        let descriptor = self
            .descriptor
            .filter(|descriptor| descriptor.is::<V>() && !descriptor.is_pinned())?;
        self.descriptor = None;

        let mut slot = MaybeUninit::<V>::uninit();
        let storage = NonNull::from(&mut self.storage);
        // SAFETY:
        // 1. The descriptor described the live value in the buffer.
        // 2. `slot` is a valid place for a `V`, which is the described type.
        // 3. The descriptor has been retracted, so the buffer is empty now.
        unsafe {
            descriptor.move_out(storage, NonNull::from(&mut slot).cast::<Erased>());
        }
        // SAFETY: `move_out` initialized the slot.
        Some(unsafe { slot.assume_init() })
    }

    /// Creates a copy of this container.
    ///
    /// Returns [`Unsupported`] if a value is held whose handler cannot clone
    /// it. `self` is never modified.
    pub fn try_clone(&self) -> Result<Self, Unsupported> {
        let mut clone = Self::new();
        if let Some(descriptor) = self.descriptor {
            let target = NonNull::from(&mut clone.storage);
            // SAFETY:
            // 1. The descriptor describes the live value in our buffer.
            // 2. `clone` is new, so its buffer is writable and empty.
            unsafe {
                descriptor.clone_construct(self.storage.as_ptr(), target)?;
            }
            clone.descriptor = Some(descriptor);
        }
        Ok(clone)
    }

    /// Overwrites this container with a copy of `source`.
    ///
    /// If both containers hold values stored the same way, the held value is
    /// assigned in place through [`CloneHandler::try_clone_from`]. Otherwise
    /// the held value is replaced by a clone of the source.
    ///
    /// Returns [`Unsupported`] if the source value cannot be cloned, in which
    /// case neither container is modified. When the value is replaced rather
    /// than assigned, the old value is dropped after the clone is in place.
    pub fn try_clone_from(&mut self, source: &RawHoldall) -> Result<(), Unsupported> {
        match (self.descriptor, source.descriptor) {
            (_, None) => {
                self.clear();
                Ok(())
            }
            (Some(target), Some(descriptor)) if target.same_as(descriptor) => {
                let target = NonNull::from(&mut self.storage);
                // SAFETY:
                // 1. Both buffers hold live values described by `descriptor`, and
                //    they are distinct since we hold `&mut self` and `&source`.
                // 2. The target buffer is reached through `&mut self`.
                unsafe { descriptor.clone_assign(source.storage.as_ptr(), target) }
            }
            (_, Some(_)) => {
                let clone = source.try_clone()?;
                let previous = core::mem::replace(self, clone);
                drop(previous);
                Ok(())
            }
        }
    }

    /// Moves the value held by `source` into this container, leaving `source`
    /// empty.
    ///
    /// If both containers hold values stored the same way, the held value is
    /// assigned in place. An empty source empties this container. This never
    /// fails.
    ///
    /// The value this container held before is dropped last. If its
    /// destructor panics, this container already holds the moved value.
    pub fn move_from(&mut self, source: &mut RawHoldall) {
        let Some(descriptor) = source.descriptor.take() else {
            self.clear();
            return;
        };
        let from = NonNull::from(&mut source.storage);

        match self.descriptor {
            Some(target) if target.same_as(descriptor) => {
                let to = NonNull::from(&mut self.storage);
                // SAFETY:
                // 1. Both buffers hold live values described by `descriptor`, and
                //    they are distinct since we hold two mutable references.
                // 2. The target buffer is reached through `&mut self`.
                // 3. The source descriptor has been retracted.
                unsafe {
                    descriptor.move_assign(from, to);
                }
            }
            _ => {
                let previous = core::mem::take(self);
                let to = NonNull::from(&mut self.storage);
                // SAFETY:
                // 1. The source buffer holds the value `descriptor` describes.
                // 2. `self` was just replaced by an empty container.
                // 3. The source descriptor has been retracted.
                unsafe {
                    descriptor.move_construct(from, to);
                }
                self.descriptor = Some(descriptor);
                drop(previous);
            }
        }
    }
}

impl Default for RawHoldall {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::ops::Drop for RawHoldall {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::String, vec, vec::Vec};
    use core::mem::size_of;

    use super::*;

    struct AlwaysClone;
    impl<V: Clone> CloneHandler<V> for AlwaysClone {
        const CLONEABLE: bool = true;

        fn try_clone(value: &V) -> Result<V, Unsupported> {
            Ok(value.clone())
        }

        fn try_clone_from(target: &mut V, source: &V) -> Result<(), Unsupported> {
            target.clone_from(source);
            Ok(())
        }
    }

    static_assertions::assert_not_impl_any!(RawHoldall: Send, Sync);

    #[test]
    fn test_raw_holdall_size() {
        assert_eq!(size_of::<RawHoldall>(), 3 * size_of::<usize>());
    }

    #[test]
    fn test_strategy_selection() {
        let mut raw = RawHoldall::new();
        assert!(!raw.is_inline());

        raw.emplace_with::<u32, AlwaysClone, _>(|| 7);
        assert!(raw.is_inline());
        assert!(!raw.is_pinned());

        raw.emplace_with::<[u64; 4], AlwaysClone, _>(|| [1, 2, 3, 4]);
        assert!(!raw.is_inline());
        assert!(!raw.is_pinned());

        let _ = raw.emplace_pinned_with::<u32, AlwaysClone, _>(|| 7);
        assert!(!raw.is_inline());
        assert!(raw.is_pinned());
    }

    #[test]
    fn test_inline_value_lives_in_buffer() {
        let mut raw = RawHoldall::new();
        raw.emplace_with::<u64, AlwaysClone, _>(|| 99);

        let value: *const u64 = raw.downcast_ref::<u64>().unwrap();
        let buffer: *const Storage = &raw.storage;
        assert_eq!(value.cast::<u8>(), buffer.cast::<u8>());
    }

    #[test]
    fn test_pinned_value_is_not_mutable() {
        let mut raw = RawHoldall::new();
        let _ = raw.emplace_pinned_with::<String, AlwaysClone, _>(|| String::from("fixed"));

        assert_eq!(raw.downcast_ref::<String>().map(String::as_str), Some("fixed"));
        assert!(raw.downcast_mut::<String>().is_none());
        assert!(raw.take::<String>().is_none());
        assert!(raw.downcast_pin_mut::<String>().is_some());
        assert!(raw.is::<String>());
    }

    #[test]
    fn test_move_from_same_descriptor() {
        let mut source = RawHoldall::new();
        let mut target = RawHoldall::new();
        source.emplace_with::<Vec<u8>, AlwaysClone, _>(|| vec![1, 2, 3]);
        target.emplace_with::<Vec<u8>, AlwaysClone, _>(|| vec![9]);
        assert!(target.same_descriptor(&source));

        target.move_from(&mut source);
        assert!(source.is_empty());
        assert_eq!(target.downcast_ref::<Vec<u8>>().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_move_from_keeps_pinned_address() {
        let mut source = RawHoldall::new();
        let _ = source.emplace_pinned_with::<Box<u8>, AlwaysClone, _>(|| Box::new(1));
        let before: *const Box<u8> = source.downcast_ref::<Box<u8>>().unwrap();

        let mut target = RawHoldall::new();
        target.move_from(&mut source);
        let after: *const Box<u8> = target.downcast_ref::<Box<u8>>().unwrap();

        assert_eq!(before, after);
        assert!(source.is_empty());
    }
}
