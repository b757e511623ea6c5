//! Release strategies for the native object families, and the macro typed
//! wrappers use to sit on top of [`Handle`](crate::Handle).
//!
//! - GObject instances: `g_object_ref` / `g_object_unref`.
//! - Reference-counted boxed types: their own `*_ref` / `*_unref`.
//! - Copy-on-share boxed types: `*_copy` / `*_free`; sharing yields a copy.
//! - Interned values (`PangoLanguage`): never freed.
//!
//! Release needs the bound surface. A handle can only exist for a pointer a
//! native call returned, so the surface is always there in practice; if it is
//! not, the release is skipped and logged.

use crate::object::{NativeObject, RefCounted};
use crate::surface::Surface;
use crate::sys::*;
use std::ptr::{self, NonNull};

fn bound_surface(type_name: &str, operation: &str) -> Option<&'static Surface> {
    let surface = Surface::get();
    if surface.is_none() {
        log::error!("{operation} on {type_name} before the native libraries were bound");
    }
    surface
}

macro_rules! gobject_kind {
    ($($ty:ident),* $(,)?) => {
        $(
            impl NativeObject for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                unsafe fn release(ptr: NonNull<Self>) {
                    if let Some(surface) = bound_surface(Self::TYPE_NAME, "release") {
                        unsafe { (surface.gobject().g_object_unref)(ptr.as_ptr().cast()) };
                    }
                }
            }

            impl RefCounted for $ty {
                unsafe fn add_ref(ptr: NonNull<Self>) -> *mut Self {
                    match bound_surface(Self::TYPE_NAME, "add_ref") {
                        Some(surface) => unsafe {
                            (surface.gobject().g_object_ref)(ptr.as_ptr().cast()).cast()
                        },
                        None => ptr::null_mut(),
                    }
                }
            }
        )*
    };
}

macro_rules! boxed_kind {
    ($ty:ident, $share:ident, $release:ident) => {
        impl NativeObject for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            unsafe fn release(ptr: NonNull<Self>) {
                if let Some(surface) = bound_surface(Self::TYPE_NAME, "release") {
                    unsafe { (surface.pango().$release)(ptr.as_ptr()) };
                }
            }
        }

        impl RefCounted for $ty {
            unsafe fn add_ref(ptr: NonNull<Self>) -> *mut Self {
                match bound_surface(Self::TYPE_NAME, "add_ref") {
                    Some(surface) => unsafe { (surface.pango().$share)(ptr.as_ptr()) },
                    None => ptr::null_mut(),
                }
            }
        }
    };
}

gobject_kind!(PangoContext, PangoLayout, PangoFontMap, PangoFont);

boxed_kind!(PangoAttrList, pango_attr_list_ref, pango_attr_list_unref);
boxed_kind!(PangoFontDescription, pango_font_description_copy, pango_font_description_free);
boxed_kind!(PangoTabArray, pango_tab_array_copy, pango_tab_array_free);

impl NativeObject for PangoLanguage {
    const TYPE_NAME: &'static str = "PangoLanguage";

    // Languages are interned for the life of the process.
    unsafe fn release(_ptr: NonNull<Self>) {}
}

/// Declare a typed wrapper over [`Handle`](crate::Handle).
///
/// ```ignore
/// native_wrapper! {
///     /// A paragraph of laid-out text.
///     pub struct Layout(PangoLayout);
/// }
/// ```
///
/// The wrapper gets `from_raw_full` / `from_raw_none` constructors, access to
/// the handle and pointer, and address equality.
#[macro_export]
macro_rules! native_wrapper {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($raw:ty);
    ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        $vis struct $name {
            handle: $crate::Handle<$raw>,
        }

        impl $name {
            /// Take over the reference a native call transferred to us.
            pub fn from_raw_full(ptr: *mut $raw) -> ::std::result::Result<Self, $crate::ObjectError> {
                $crate::Handle::wrap_full(ptr).map(Self::from_handle)
            }

            /// View a pointer we don't own.
            pub fn from_raw_none(ptr: *mut $raw) -> ::std::result::Result<Self, $crate::ObjectError> {
                $crate::Handle::wrap_none(ptr).map(Self::from_handle)
            }

            pub fn from_handle(handle: $crate::Handle<$raw>) -> Self {
                Self { handle }
            }

            pub fn handle(&self) -> &$crate::Handle<$raw> {
                &self.handle
            }

            pub fn into_handle(self) -> $crate::Handle<$raw> {
                self.handle
            }

            /// Pointer for the next native call.
            pub fn as_ptr(&self) -> ::std::result::Result<*mut $raw, $crate::ObjectError> {
                self.handle.unwrap()
            }
        }
    };
}
