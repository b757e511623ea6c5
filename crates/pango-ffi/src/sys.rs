//! C type definitions shared by the Pango, GObject and GLib tables.
//!
//! Only the handful of layouts the binding core touches are spelled out;
//! everything else is an opaque type that is only ever handled by pointer.
#![allow(non_camel_case_types, dead_code)]

use std::ffi::{c_char, c_int, c_uint, c_void, CStr};

pub type gboolean = c_int;
pub type gint = c_int;
pub type guint = c_uint;
pub type gpointer = *mut c_void;
pub type gconstpointer = *const c_void;
pub type GType = usize;

pub const GFALSE: gboolean = 0;
pub const GTRUE: gboolean = 1;

/// Number of Pango units per device unit.
pub const PANGO_SCALE: c_int = 1024;

/// Header shared by every instantiated GType.
#[repr(C)]
pub struct GTypeInstance {
    pub g_class: *mut c_void,
}

/// Public layout of `GObject`; `ref_count` is read-only from our side.
#[repr(C)]
pub struct GObject {
    pub g_type_instance: GTypeInstance,
    pub ref_count: guint,
    pub qdata: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PangoRectangle {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
}

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _unused: [u8; 0],
            }
        )*
    };
}

opaque!(
    PangoContext,
    PangoLayout,
    PangoFontMap,
    PangoFont,
    PangoFontDescription,
    PangoAttrList,
    PangoTabArray,
    PangoLanguage,
);

/// Copy a NUL-terminated string owned by the native side.
///
/// # Safety
///
/// `ptr` must be null or point to a valid NUL-terminated string that stays
/// alive for the duration of the call.
pub unsafe fn string_from_ptr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}
