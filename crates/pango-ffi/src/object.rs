//! Owner-aware handles around native reference-counted objects.
//!
//! A [`Handle`] carries a non-null native pointer and a flag saying whether it
//! owns one native reference. Owning handles give that reference back exactly
//! once, either through [`Handle::release`] or on drop. Non-owning handles are
//! views and never touch the reference count.
//!
//! Handles compare by address, so two handles over the same native object are
//! equal whatever their ownership or kind.

use crate::error::ObjectError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// A native type that a [`Handle`] can manage.
///
/// Implemented on the pointee type itself (e.g. `PangoLayout`).
pub trait NativeObject {
    /// Native type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Give back one reference to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object on which the caller owns a reference.
    unsafe fn release(ptr: NonNull<Self>);
}

/// Native objects that can hand out additional references.
pub trait RefCounted: NativeObject {
    /// Take a new reference. May return a different pointer for types whose
    /// "reference" is a copy.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object.
    unsafe fn add_ref(ptr: NonNull<Self>) -> *mut Self;
}

/// Ownership-flagged handle to a native object.
///
/// Handles are neither `Send` nor `Sync`: the native libraries decide which
/// objects may cross threads, not this wrapper.
pub struct Handle<T: NativeObject> {
    ptr: NonNull<T>,
    owns_reference: bool,
    released: bool,
}

impl<T: NativeObject> Handle<T> {
    /// Wrap a pointer returned by a native call.
    ///
    /// With `owns_reference` the handle becomes responsible for releasing one
    /// reference; otherwise it is a view.
    pub fn wrap(ptr: *mut T, owns_reference: bool) -> Result<Self, ObjectError> {
        let ptr = NonNull::new(ptr).ok_or(ObjectError::InvalidObject {
            operation: "wrap",
            type_name: T::TYPE_NAME,
        })?;
        Ok(Self {
            ptr,
            owns_reference,
            released: false,
        })
    }

    /// Wrap a pointer whose reference is transferred to us.
    pub fn wrap_full(ptr: *mut T) -> Result<Self, ObjectError> {
        Self::wrap(ptr, true)
    }

    /// Wrap a pointer we don't own (accessor results and the like).
    pub fn wrap_none(ptr: *mut T) -> Result<Self, ObjectError> {
        Self::wrap(ptr, false)
    }

    /// Raw pointer for passing back into native calls.
    pub fn unwrap(&self) -> Result<*mut T, ObjectError> {
        self.check_live("unwrap")?;
        Ok(self.ptr.as_ptr())
    }

    /// Give back the owned reference now instead of at drop.
    ///
    /// Releasing a view is a no-op. Releasing an owning handle twice is an
    /// error and never decrements twice.
    pub fn release(&mut self) -> Result<(), ObjectError> {
        if !self.owns_reference {
            return Ok(());
        }
        self.check_live("release")?;
        self.released = true;
        unsafe { T::release(self.ptr) };
        Ok(())
    }

    /// Hand the owned reference (if any) back to the caller as a raw pointer,
    /// e.g. for a native call that takes ownership.
    pub fn into_raw(self) -> Result<*mut T, ObjectError> {
        self.check_live("into_raw")?;
        let this = ManuallyDrop::new(self);
        Ok(this.ptr.as_ptr())
    }

    pub fn owns_reference(&self) -> bool {
        self.owns_reference
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Address of the native object, the handle's identity.
    pub fn as_addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    fn check_live(&self, operation: &'static str) -> Result<(), ObjectError> {
        if self.released {
            return Err(ObjectError::UseAfterRelease {
                operation,
                type_name: T::TYPE_NAME,
            });
        }
        Ok(())
    }
}

impl<T: RefCounted> Handle<T> {
    /// Wrap a borrowed pointer by taking our own reference to it.
    pub fn wrap_borrowed(ptr: *mut T) -> Result<Self, ObjectError> {
        let borrowed = Self::wrap_none(ptr)?;
        borrowed.share()
    }

    /// New owning handle with its own reference to the same object.
    pub fn share(&self) -> Result<Self, ObjectError> {
        self.check_live("share")?;
        let ptr = unsafe { T::add_ref(self.ptr) };
        NonNull::new(ptr)
            .map(|ptr| Self {
                ptr,
                owns_reference: true,
                released: false,
            })
            .ok_or(ObjectError::InvalidObject {
                operation: "share",
                type_name: T::TYPE_NAME,
            })
    }
}

impl<T: NativeObject> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.owns_reference && !self.released {
            self.released = true;
            unsafe { T::release(self.ptr) };
        }
    }
}

impl<T: NativeObject, U: NativeObject> PartialEq<Handle<U>> for Handle<T> {
    fn eq(&self, other: &Handle<U>) -> bool {
        self.as_addr() == other.as_addr()
    }
}

impl<T: NativeObject> Eq for Handle<T> {}

impl<T: NativeObject> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_addr().hash(state);
    }
}

impl<T: NativeObject> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &T::TYPE_NAME)
            .field("ptr", &self.ptr)
            .field("owns_reference", &self.owns_reference)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::ptr;

    thread_local! {
        static RELEASES: Cell<usize> = const { Cell::new(0) };
        static REFS: Cell<usize> = const { Cell::new(0) };
    }

    struct Probe {
        _id: u8,
    }

    impl NativeObject for Probe {
        const TYPE_NAME: &'static str = "Probe";

        unsafe fn release(_ptr: NonNull<Self>) {
            RELEASES.with(|c| c.set(c.get() + 1));
        }
    }

    impl RefCounted for Probe {
        unsafe fn add_ref(ptr: NonNull<Self>) -> *mut Self {
            REFS.with(|c| c.set(c.get() + 1));
            ptr.as_ptr()
        }
    }

    /// Never hands out a reference, like a failed native copy.
    struct Stubborn;

    impl NativeObject for Stubborn {
        const TYPE_NAME: &'static str = "Stubborn";

        unsafe fn release(_ptr: NonNull<Self>) {}
    }

    impl RefCounted for Stubborn {
        unsafe fn add_ref(_ptr: NonNull<Self>) -> *mut Self {
            ptr::null_mut()
        }
    }

    fn reset() {
        RELEASES.with(|c| c.set(0));
        REFS.with(|c| c.set(0));
    }

    fn releases() -> usize {
        RELEASES.with(Cell::get)
    }

    fn refs() -> usize {
        REFS.with(Cell::get)
    }

    #[test]
    fn null_is_invalid() {
        reset();
        for owns in [true, false] {
            let err = Handle::<Probe>::wrap(ptr::null_mut(), owns).unwrap_err();
            assert_eq!(
                err,
                ObjectError::InvalidObject {
                    operation: "wrap",
                    type_name: "Probe"
                }
            );
        }
        assert_eq!(releases(), 0);
    }

    #[test]
    fn view_never_releases() {
        reset();
        let mut obj = Probe { _id: 0 };
        let p: *mut Probe = &mut obj;

        let mut view = Handle::wrap_none(p).unwrap();
        assert_eq!(view.unwrap().unwrap(), p);
        view.release().unwrap();
        view.release().unwrap();
        assert_eq!(view.unwrap().unwrap(), p);
        drop(view);

        assert_eq!(releases(), 0);
    }

    #[test]
    fn owned_releases_once() {
        reset();
        let mut obj = Probe { _id: 0 };
        let p: *mut Probe = &mut obj;

        let mut handle = Handle::wrap_full(p).unwrap();
        assert!(handle.owns_reference());
        assert_eq!(handle.unwrap().unwrap(), p);

        handle.release().unwrap();
        assert!(handle.is_released());
        assert_eq!(releases(), 1);

        assert_eq!(
            handle.release(),
            Err(ObjectError::UseAfterRelease {
                operation: "release",
                type_name: "Probe"
            })
        );
        assert!(matches!(
            handle.unwrap(),
            Err(ObjectError::UseAfterRelease { operation: "unwrap", .. })
        ));

        drop(handle);
        assert_eq!(releases(), 1);
    }

    #[test]
    fn drop_releases_owned() {
        reset();
        let mut obj = Probe { _id: 0 };
        {
            let _handle = Handle::wrap_full(&mut obj as *mut Probe).unwrap();
        }
        assert_eq!(releases(), 1);
    }

    #[test]
    fn equality_is_by_address() {
        reset();
        let mut a = Probe { _id: 0 };
        let mut b = Probe { _id: 1 };
        let pa: *mut Probe = &mut a;
        let pb: *mut Probe = &mut b;

        let owner = Handle::wrap_full(pa).unwrap();
        let view = Handle::wrap_none(pa).unwrap();
        let other = Handle::wrap_none(pb).unwrap();

        assert_eq!(owner, view);
        assert_ne!(owner, other);

        // Kinds don't matter either, only the address.
        let erased = Handle::<Stubborn>::wrap_none(pa.cast()).unwrap();
        assert!(owner == erased);

        let set: std::collections::HashSet<_> = [view, other].into_iter().collect();
        assert!(set.contains(&owner));
    }

    #[test]
    fn share_takes_its_own_reference() {
        reset();
        let mut obj = Probe { _id: 0 };
        let p: *mut Probe = &mut obj;

        let first = Handle::wrap_full(p).unwrap();
        let second = first.share().unwrap();
        assert_eq!(refs(), 1);
        assert_eq!(first, second);

        drop(first);
        drop(second);
        assert_eq!(releases(), 2);
    }

    #[test]
    fn wrap_borrowed_owns() {
        reset();
        let mut obj = Probe { _id: 0 };
        let handle = Handle::wrap_borrowed(&mut obj as *mut Probe).unwrap();
        assert!(handle.owns_reference());
        assert_eq!(refs(), 1);
        drop(handle);
        assert_eq!(releases(), 1);
    }

    #[test]
    fn share_after_release_fails() {
        reset();
        let mut obj = Probe { _id: 0 };
        let mut handle = Handle::wrap_full(&mut obj as *mut Probe).unwrap();
        handle.release().unwrap();
        assert!(matches!(
            handle.share(),
            Err(ObjectError::UseAfterRelease { operation: "share", .. })
        ));
        assert_eq!(refs(), 0);
    }

    #[test]
    fn failed_reference_is_invalid() {
        reset();
        let mut obj = Stubborn;
        let handle = Handle::wrap_none(&mut obj as *mut Stubborn).unwrap();
        assert!(matches!(
            handle.share(),
            Err(ObjectError::InvalidObject { operation: "share", .. })
        ));
    }

    #[test]
    fn into_raw_skips_release() {
        reset();
        let mut obj = Probe { _id: 0 };
        let p: *mut Probe = &mut obj;
        let handle = Handle::wrap_full(p).unwrap();
        assert_eq!(handle.into_raw().unwrap(), p);
        assert_eq!(releases(), 0);
    }
}
