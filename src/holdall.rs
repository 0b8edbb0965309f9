use core::{any::TypeId, pin::Pin};

use holdall_internals::RawHoldall;

use crate::{
    error::{CastError, CopyUnsupported},
    handlers::{self, CloneHandler},
    markers::{Local, PayloadMarkerFor, SendSync},
    trace::{debug_event, trace_event},
    type_token::TypeToken,
};

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `raw` field
/// an unsafe field and remove this module.
mod limit_field_access {
    use core::marker::PhantomData;

    use holdall_internals::RawHoldall;

    use crate::markers::SendSync;

    /// A container holding at most one value of any `'static` type.
    ///
    /// Values that fit into two pointers (see
    /// [`fits_inline`](crate::fits_inline)) are stored inline without
    /// allocating. Larger or over-aligned values are boxed, and so are values
    /// stored with [`Holdall::from_pinned`] so that their address never
    /// changes.
    ///
    /// # Type Parameters
    /// - `ThreadSafety`: The thread safety marker for the container. This can
    ///   either be [`SendSync`] or [`Local`](crate::markers::Local).
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let mut holdall: Holdall = Holdall::new();
    /// assert!(holdall.is_empty());
    ///
    /// holdall.emplace(42i32);
    /// assert_eq!(holdall.downcast_ref::<i32>(), Some(&42));
    /// assert_eq!(holdall.downcast_ref::<f64>(), None);
    ///
    /// holdall.emplace(String::from("now a string"));
    /// assert!(holdall.is::<String>());
    /// ```
    #[repr(transparent)]
    pub struct Holdall<ThreadSafety: 'static = SendSync> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If `T = SendSync`: The value held by the [`RawHoldall`], if any,
        ///    must be `Send + Sync`.
        raw: RawHoldall,
        _thread_safety: PhantomData<ThreadSafety>,
    }

    impl<T> Holdall<T> {
        /// Creates a new, empty [`Holdall`].
        ///
        /// # Examples
        ///
        /// ```
        /// use holdall::Holdall;
        ///
        /// let holdall: Holdall = Holdall::new();
        /// assert!(holdall.is_empty());
        /// ```
        #[must_use]
        pub const fn new() -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. `Holdall` is only ever named with `SendSync` or `Local`, the
            //    only markers values can be stored for.
            // 2. The container is empty.
            Holdall {
                raw: RawHoldall::new(),
                _thread_safety: PhantomData,
            }
        }

        /// Creates a [`Holdall`] from a raw container.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If `T = SendSync`: The value held by the [`RawHoldall`], if any,
        ///    must be `Send + Sync`.
        #[must_use]
        pub(crate) unsafe fn from_raw(raw: RawHoldall) -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by caller
            // 2. Guaranteed by caller
            Holdall {
                raw,
                _thread_safety: PhantomData,
            }
        }

        /// Consumes the [`Holdall`] and returns the inner [`RawHoldall`].
        #[must_use]
        pub(crate) fn into_raw(self) -> RawHoldall {
            // SAFETY: We are destroying `self`, so we no longer
            // need to uphold any safety invariants.
            self.raw
        }

        /// Returns a shared reference to the inner [`RawHoldall`].
        pub(crate) fn as_raw(&self) -> &RawHoldall {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Upheld as the type parameters do not change.
            // 2. No value can be stored through a shared reference.
            &self.raw
        }

        /// Returns a mutable reference to the inner [`RawHoldall`].
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. If `T = SendSync`: Any value stored through the returned
        ///    reference must be `Send + Sync`.
        pub(crate) unsafe fn as_raw_mut(&mut self) -> &mut RawHoldall {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Upheld as the type parameters do not change.
            // 2. Guaranteed by the caller
            &mut self.raw
        }
    }
}
pub use limit_field_access::Holdall;

// SAFETY: A `Holdall<SendSync>` only ever holds `Send + Sync` values, as
// enforced by the `PayloadMarkerFor<SendSync>` bounds on every method that
// stores a value. The descriptor it refers to is immutable static data.
unsafe impl Send for Holdall<SendSync> {}

// SAFETY: A `Holdall<SendSync>` only ever holds `Send + Sync` values, and
// shared references only give out shared references to the value.
unsafe impl Sync for Holdall<SendSync> {}

impl<T> Holdall<T> {
    /// Creates a [`Holdall`] holding `value`, which can later be copied with
    /// [`Holdall::try_clone`].
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let holdall: Holdall = Holdall::from_value([1u64; 8]);
    /// assert!(!holdall.is_inline());
    /// assert_eq!(holdall.downcast_ref::<[u64; 8]>(), Some(&[1; 8]));
    /// ```
    #[must_use]
    pub fn from_value<V>(value: V) -> Self
    where
        V: PayloadMarkerFor<T> + Clone,
    {
        Self::from_custom::<V, handlers::Cloneable>(value)
    }

    /// Creates a [`Holdall`] holding a value that does not implement
    /// [`Clone`].
    ///
    /// Copying the container later reports [`CopyUnsupported`].
    #[must_use]
    pub fn from_uncloneable<V>(value: V) -> Self
    where
        V: PayloadMarkerFor<T>,
    {
        Self::from_custom::<V, handlers::Uncloneable>(value)
    }

    /// Creates a [`Holdall`] holding `value` with a custom clone handler.
    #[must_use]
    pub fn from_custom<V, H>(value: V) -> Self
    where
        V: PayloadMarkerFor<T>,
        H: CloneHandler<V>,
    {
        let mut holdall = Self::new();
        holdall.emplace_custom::<V, H>(value);
        holdall
    }

    /// Creates a [`Holdall`] holding `value` at a fixed address.
    ///
    /// The value is boxed, even if it would fit inline, and keeps its address
    /// until it is destroyed. It can be read through
    /// [`downcast_ref`](Holdall::downcast_ref) and mutated through
    /// [`downcast_pin_mut`](Holdall::downcast_pin_mut), but never moved out.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::marker::PhantomPinned;
    ///
    /// use holdall::Holdall;
    ///
    /// struct SelfReferential {
    ///     data: [u8; 4],
    ///     _pin: PhantomPinned,
    /// }
    ///
    /// let holdall: Holdall = Holdall::from_pinned(SelfReferential {
    ///     data: [1, 2, 3, 4],
    ///     _pin: PhantomPinned,
    /// });
    /// assert!(holdall.is_pinned());
    /// assert_eq!(holdall.downcast_ref::<SelfReferential>().unwrap().data, [1, 2, 3, 4]);
    /// ```
    #[must_use]
    pub fn from_pinned<V>(value: V) -> Self
    where
        V: PayloadMarkerFor<T>,
    {
        Self::from_pinned_custom::<V, handlers::Uncloneable>(value)
    }

    /// Creates a [`Holdall`] holding `value` at a fixed address, which can
    /// later be copied with [`Holdall::try_clone`].
    ///
    /// A copy is a new allocation with its own address. Copying over a
    /// pinned value of the same type replaces it with a fresh copy instead
    /// of assigning through `&mut V`.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let original: Holdall = Holdall::from_pinned_cloneable(String::from("fixed"));
    /// let copy = original.try_clone().unwrap();
    /// assert!(copy.is_pinned());
    ///
    /// let a: *const String = original.downcast_ref::<String>().unwrap();
    /// let b: *const String = copy.downcast_ref::<String>().unwrap();
    /// assert_ne!(a, b);
    /// ```
    #[must_use]
    pub fn from_pinned_cloneable<V>(value: V) -> Self
    where
        V: PayloadMarkerFor<T> + Clone,
    {
        Self::from_pinned_custom::<V, handlers::Cloneable>(value)
    }

    /// Creates a [`Holdall`] holding `value` at a fixed address, with a
    /// custom clone handler.
    #[must_use]
    pub fn from_pinned_custom<V, H>(value: V) -> Self
    where
        V: PayloadMarkerFor<T>,
        H: CloneHandler<V>,
    {
        let mut holdall = Self::new();
        let _ = holdall.emplace_pinned_custom::<V, H>(value);
        holdall
    }

    /// Replaces the held value with `value`, and returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let mut holdall: Holdall = Holdall::new();
    /// let names = holdall.emplace(vec!["a".to_string()]);
    /// names.push("b".to_string());
    /// assert_eq!(holdall.downcast_ref::<Vec<String>>().unwrap().len(), 2);
    /// ```
    pub fn emplace<V>(&mut self, value: V) -> &mut V
    where
        V: PayloadMarkerFor<T> + Clone,
    {
        self.emplace_custom::<V, handlers::Cloneable>(value)
    }

    /// Replaces the held value with the one returned by `make`, and returns a
    /// reference to it.
    ///
    /// The previous value is destroyed before `make` runs. If `make` panics
    /// the container is left empty.
    pub fn emplace_with<V, F>(&mut self, make: F) -> &mut V
    where
        V: PayloadMarkerFor<T> + Clone,
        F: FnOnce() -> V,
    {
        self.emplace_custom_with::<V, handlers::Cloneable, F>(make)
    }

    /// Replaces the held value with a value that does not implement
    /// [`Clone`].
    pub fn emplace_uncloneable<V>(&mut self, value: V) -> &mut V
    where
        V: PayloadMarkerFor<T>,
    {
        self.emplace_custom::<V, handlers::Uncloneable>(value)
    }

    /// Replaces the held value with `value`, using a custom clone handler.
    pub fn emplace_custom<V, H>(&mut self, value: V) -> &mut V
    where
        V: PayloadMarkerFor<T>,
        H: CloneHandler<V>,
    {
        self.emplace_custom_with::<V, H, _>(|| value)
    }

    /// Replaces the held value with the one returned by `make`, using a
    /// custom clone handler.
    ///
    /// If `make` panics the container is left empty.
    ///
    /// # Panics
    ///
    /// With debug assertions enabled, panics if `V` is itself a [`Holdall`].
    /// Containers are transferred into each other with
    /// [`move_from`](Holdall::move_from) or
    /// [`try_clone_from`](Holdall::try_clone_from), never nested. This
    /// applies to every method that stores a value.
    pub fn emplace_custom_with<V, H, F>(&mut self, make: F) -> &mut V
    where
        V: PayloadMarkerFor<T>,
        H: CloneHandler<V>,
        F: FnOnce() -> V,
    {
        trace_event!(
            value_type = core::any::type_name::<V>(),
            inline = crate::fits_inline::<V>(),
            "storing value"
        );
        debug_assert!(
            !is_container::<V>(),
            "a `Holdall` cannot hold another `Holdall`, use `move_from` instead"
        );
        // SAFETY:
        // 1. `V: PayloadMarkerFor<T>`, which is only implemented for `Send +
        //    Sync` types when `T = SendSync`.
        let raw = unsafe { self.as_raw_mut() };
        raw.emplace_with::<V, H, F>(make)
    }

    /// Replaces the held value with `value`, stored at a fixed address, and
    /// returns a pinned reference to it.
    ///
    /// See [`Holdall::from_pinned`].
    pub fn emplace_pinned<V>(&mut self, value: V) -> Pin<&mut V>
    where
        V: PayloadMarkerFor<T>,
    {
        self.emplace_pinned_custom::<V, handlers::Uncloneable>(value)
    }

    /// Replaces the held value with a cloneable `value`, stored at a fixed
    /// address.
    ///
    /// See [`Holdall::from_pinned_cloneable`].
    pub fn emplace_pinned_cloneable<V>(&mut self, value: V) -> Pin<&mut V>
    where
        V: PayloadMarkerFor<T> + Clone,
    {
        self.emplace_pinned_custom::<V, handlers::Cloneable>(value)
    }

    /// Replaces the held value with `value`, stored at a fixed address and
    /// using a custom clone handler.
    pub fn emplace_pinned_custom<V, H>(&mut self, value: V) -> Pin<&mut V>
    where
        V: PayloadMarkerFor<T>,
        H: CloneHandler<V>,
    {
        trace_event!(
            value_type = core::any::type_name::<V>(),
            pinned = true,
            "storing value"
        );
        debug_assert!(
            !is_container::<V>(),
            "a `Holdall` cannot hold another `Holdall`, use `move_from` instead"
        );
        // SAFETY:
        // 1. `V: PayloadMarkerFor<T>`, which is only implemented for `Send +
        //    Sync` types when `T = SendSync`.
        let raw = unsafe { self.as_raw_mut() };
        raw.emplace_pinned_with::<V, H, _>(|| value)
    }

    /// Replaces the held value with `value`.
    ///
    /// This is the same as [`Holdall::emplace`], without returning a
    /// reference.
    pub fn assign<V>(&mut self, value: V)
    where
        V: PayloadMarkerFor<T> + Clone,
    {
        self.emplace(value);
    }

    /// Destroys the held value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let mut holdall: Holdall = Holdall::from_value(1u8);
    /// holdall.clear();
    /// assert!(holdall.is_empty());
    ///
    /// // Clearing an empty container does nothing
    /// holdall.clear();
    /// assert!(holdall.is_empty());
    /// ```
    pub fn clear(&mut self) {
        trace_event!(value_type = self.type_name(), "clearing holdall");
        // SAFETY:
        // 1. Clearing stores no value.
        let raw = unsafe { self.as_raw_mut() };
        raw.clear();
    }

    /// Returns `true` if no value is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_raw().is_empty()
    }

    /// Returns the identity of the held type, or [`TypeToken::none`] when
    /// empty.
    #[must_use]
    pub fn type_token(&self) -> TypeToken {
        let raw = self.as_raw();
        match (raw.type_id(), raw.type_name()) {
            (Some(id), Some(name)) => TypeToken::from_parts(id, name),
            _ => TypeToken::none(),
        }
    }

    /// Returns the [`TypeId`] of the held value.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.as_raw().type_id()
    }

    /// Returns the type name of the held value.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.as_raw().type_name()
    }

    /// Returns `true` if a value of type `V` is held.
    #[must_use]
    pub fn is<V: 'static>(&self) -> bool {
        self.as_raw().is::<V>()
    }

    /// Returns `true` if a value is held directly in the inline buffer.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.as_raw().is_inline()
    }

    /// Returns `true` if a value is held at a fixed address.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.as_raw().is_pinned()
    }

    /// Returns `true` if a value is held and it can be copied.
    #[must_use]
    pub fn is_cloneable(&self) -> bool {
        self.as_raw().is_cloneable()
    }

    /// Returns a reference to the held value if it is of type `V`.
    #[must_use]
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.as_raw().downcast_ref::<V>()
    }

    /// Returns a mutable reference to the held value if it is of type `V`.
    ///
    /// Returns `None` for pinned values, use
    /// [`downcast_pin_mut`](Holdall::downcast_pin_mut) for those.
    #[must_use]
    pub fn downcast_mut<V: 'static>(&mut self) -> Option<&mut V> {
        // SAFETY:
        // 1. Only an existing value is reached. Anything written through the
        //    `&mut V` is a `V`, which was `PayloadMarkerFor<T>` when stored.
        let raw = unsafe { self.as_raw_mut() };
        raw.downcast_mut::<V>()
    }

    /// Returns a pinned mutable reference to the held value if it is of type
    /// `V` and was stored pinned.
    #[must_use]
    pub fn downcast_pin_mut<V: 'static>(&mut self) -> Option<Pin<&mut V>> {
        // SAFETY:
        // 1. Only an existing value is reached.
        let raw = unsafe { self.as_raw_mut() };
        raw.downcast_pin_mut::<V>()
    }

    /// Returns a reference to the held value, or a [`CastError`] if it is not
    /// of type `V`.
    pub fn cast_ref<V: 'static>(&self) -> Result<&V, CastError> {
        self.downcast_ref::<V>()
            .ok_or_else(|| cast_error::<V>(self.type_name(), self.is::<V>(), false))
    }

    /// Returns a mutable reference to the held value, or a [`CastError`] if
    /// it is not of type `V` or is pinned.
    pub fn cast_mut<V: 'static>(&mut self) -> Result<&mut V, CastError> {
        let found = self.type_name();
        let matches = self.is::<V>();
        // SAFETY:
        // 1. Only an existing value is reached.
        let raw = unsafe { self.as_raw_mut() };
        raw.downcast_mut::<V>()
            .ok_or_else(|| cast_error::<V>(found, matches, false))
    }

    /// Returns a pinned mutable reference to the held value, or a
    /// [`CastError`] if it is not of type `V` or was not stored pinned.
    pub fn cast_pin_mut<V: 'static>(&mut self) -> Result<Pin<&mut V>, CastError> {
        let found = self.type_name();
        let matches = self.is::<V>();
        // SAFETY:
        // 1. Only an existing value is reached.
        let raw = unsafe { self.as_raw_mut() };
        raw.downcast_pin_mut::<V>()
            .ok_or_else(|| cast_error::<V>(found, matches, true))
    }

    /// Moves the held value out if it is of type `V`, leaving the container
    /// empty.
    ///
    /// On error the container is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::{CastError, Holdall};
    ///
    /// let mut holdall: Holdall = Holdall::from_value(String::from("payload"));
    /// assert!(matches!(holdall.take::<u32>(), Err(CastError::Mismatch { .. })));
    /// assert_eq!(holdall.take::<String>().unwrap(), "payload");
    /// assert!(holdall.is_empty());
    /// ```
    pub fn take<V: 'static>(&mut self) -> Result<V, CastError> {
        let found = self.type_name();
        let matches = self.is::<V>();
        // SAFETY:
        // 1. Taking a value out stores no value.
        let raw = unsafe { self.as_raw_mut() };
        raw.take::<V>()
            .ok_or_else(|| cast_error::<V>(found, matches, false))
    }

    /// Consumes the container and returns the held value if it is of type
    /// `V`, or the container itself otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let holdall: Holdall = Holdall::from_value(5u16);
    /// let holdall = holdall.downcast::<u8>().unwrap_err();
    /// assert_eq!(holdall.downcast::<u16>().unwrap(), 5);
    /// ```
    pub fn downcast<V: 'static>(mut self) -> Result<V, Self> {
        match self.take::<V>() {
            Ok(value) => Ok(value),
            Err(_) => Err(self),
        }
    }

    /// Creates a copy of this container and its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let original: Holdall = Holdall::from_value(vec![1, 2, 3]);
    /// let copy = original.try_clone().unwrap();
    /// assert_eq!(copy.downcast_ref::<Vec<i32>>(), original.downcast_ref::<Vec<i32>>());
    ///
    /// let uncloneable: Holdall = Holdall::from_uncloneable(vec![1, 2, 3]);
    /// assert!(uncloneable.try_clone().is_err());
    /// ```
    pub fn try_clone(&self) -> Result<Self, CopyUnsupported> {
        match self.as_raw().try_clone() {
            // SAFETY:
            // 1. `T` is unchanged.
            // 2. The clone holds a value of the same type as `self`.
            Ok(raw) => Ok(unsafe { Self::from_raw(raw) }),
            Err(_) => Err(self.copy_unsupported()),
        }
    }

    /// Overwrites this container with a copy of `source`.
    ///
    /// If both containers hold values of the same type stored the same way,
    /// the value is assigned in place (through [`Clone::clone_from`] for
    /// [`handlers::Cloneable`]), so the held value keeps its storage.
    /// Otherwise the held value is replaced by a copy.
    ///
    /// On error neither container is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let source: Holdall = Holdall::from_value(vec![7u8; 4]);
    /// let mut target: Holdall = Holdall::from_value(Vec::<u8>::with_capacity(16));
    /// let buffer = target.downcast_ref::<Vec<u8>>().unwrap().as_ptr();
    ///
    /// target.try_clone_from(&source).unwrap();
    /// assert_eq!(target.downcast_ref::<Vec<u8>>().unwrap(), &[7; 4]);
    /// assert_eq!(target.downcast_ref::<Vec<u8>>().unwrap().as_ptr(), buffer);
    /// ```
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), CopyUnsupported> {
        // SAFETY:
        // 1. The stored value is a copy of the value held by `source`, which is
        //    `Send + Sync` when `T = SendSync`.
        let raw = unsafe { self.as_raw_mut() };
        match raw.try_clone_from(source.as_raw()) {
            Ok(()) => Ok(()),
            Err(_) => Err(source.copy_unsupported()),
        }
    }

    /// Builds the [`CopyUnsupported`] for the held value.
    fn copy_unsupported(&self) -> CopyUnsupported {
        let error = CopyUnsupported::new(self.type_name().unwrap_or("<none>"));
        debug_event!(%error, "copy rejected");
        error
    }

    /// Moves the held value into a new container, leaving this one empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdall::Holdall;
    ///
    /// let mut a: Holdall = Holdall::from_value(3u8);
    /// let b = a.take_holdall();
    /// assert!(a.is_empty());
    /// assert_eq!(b.downcast_ref::<u8>(), Some(&3));
    /// ```
    #[must_use]
    pub fn take_holdall(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Moves the value held by `source` into this container, leaving
    /// `source` empty.
    ///
    /// If both containers hold values of the same type stored the same way,
    /// the value is assigned in place. An empty `source` empties this
    /// container. This never fails.
    pub fn move_from(&mut self, source: &mut Self) {
        // SAFETY:
        // 1. The stored value comes from `source`, which is `Send + Sync` when
        //    `T = SendSync`.
        let raw = unsafe { self.as_raw_mut() };
        // SAFETY:
        // 1. Emptying `source` stores no value in it.
        let source = unsafe { source.as_raw_mut() };
        raw.move_from(source);
    }
}

/// Returns whether `V` is a [`Holdall`] itself.
fn is_container<V: 'static>() -> bool {
    let id = TypeId::of::<V>();
    id == TypeId::of::<Holdall<SendSync>>() || id == TypeId::of::<Holdall<Local>>()
}

/// Builds the [`CastError`] describing why a value is not available as `V`.
///
/// `found` is the held type name, `matches` whether it is a `V`, and
/// `want_pinned` whether pinned access was requested.
fn cast_error<V: 'static>(
    found: Option<&'static str>,
    matches: bool,
    want_pinned: bool,
) -> CastError {
    let expected = core::any::type_name::<V>();
    let error = match found {
        None => CastError::Empty { expected },
        Some(found) if !matches => CastError::Mismatch { expected, found },
        Some(found) if want_pinned => CastError::NotPinned { found },
        Some(found) => CastError::Pinned { found },
    };
    trace_event!(%error, "cast rejected");
    error
}

impl Holdall<SendSync> {
    /// Converts this container into one that may hold non-thread-safe
    /// values.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use holdall::{Holdall, markers::Local};
    ///
    /// let mut holdall: Holdall<Local> = Holdall::from_value(1u8).into_local();
    /// holdall.emplace(Rc::new(2u8));
    /// ```
    #[must_use]
    pub fn into_local(self) -> Holdall<Local> {
        let raw = self.into_raw();
        // SAFETY:
        // 1. `T = Local`.
        // 2. `T = Local`, so there is nothing to uphold.
        unsafe { Holdall::from_raw(raw) }
    }
}

impl<T> Default for Holdall<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for Holdall<T> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.type_name() {
            Some(name) => formatter
                .debug_struct("Holdall")
                .field("type", &name)
                .field("inline", &self.is_inline())
                .field("pinned", &self.is_pinned())
                .finish(),
            None => formatter.write_str("Holdall(<empty>)"),
        }
    }
}

impl From<Holdall<SendSync>> for Holdall<Local> {
    fn from(holdall: Holdall<SendSync>) -> Self {
        holdall.into_local()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec, vec::Vec};

    use super::*;

    static_assertions::assert_impl_all!(Holdall<SendSync>: Send, Sync);
    static_assertions::assert_not_impl_any!(Holdall<Local>: Send, Sync);
    static_assertions::assert_eq_size!(Holdall, [usize; 3]);

    #[test]
    fn test_cast_error_kinds() {
        let mut holdall: Holdall = Holdall::new();
        assert_eq!(holdall.cast_ref::<u8>(), Err(CastError::Empty { expected: "u8" }));

        holdall.emplace(1u32);
        assert_eq!(
            holdall.cast_ref::<u8>(),
            Err(CastError::Mismatch {
                expected: "u8",
                found: "u32",
            })
        );
        assert_eq!(
            holdall.cast_pin_mut::<u32>().err(),
            Some(CastError::NotPinned { found: "u32" })
        );

        let _ = holdall.emplace_pinned(2u32);
        assert_eq!(
            holdall.cast_mut::<u32>().err(),
            Some(CastError::Pinned { found: "u32" })
        );
        assert_eq!(holdall.take::<u32>(), Err(CastError::Pinned { found: "u32" }));
        assert!(holdall.cast_pin_mut::<u32>().is_ok());
        assert_eq!(holdall.cast_ref::<u32>(), Ok(&2));
    }

    #[test]
    fn test_copy_unsupported_names_type() {
        let holdall: Holdall = Holdall::from_uncloneable(String::from("secret"));
        let error = holdall.try_clone().unwrap_err();
        assert_eq!(error.type_name(), core::any::type_name::<String>());
    }

    #[test]
    fn test_debug() {
        let mut holdall: Holdall = Holdall::new();
        assert_eq!(format!("{holdall:?}"), "Holdall(<empty>)");

        holdall.emplace(vec![1u8]);
        assert_eq!(
            format!("{holdall:?}"),
            format!(
                "Holdall {{ type: {:?}, inline: false, pinned: false }}",
                core::any::type_name::<Vec<u8>>()
            )
        );
    }

    #[test]
    fn test_into_local_keeps_value() {
        let holdall: Holdall = Holdall::from_value(9u64);
        let local: Holdall<Local> = holdall.into();
        assert_eq!(local.downcast_ref::<u64>(), Some(&9));
    }
}
