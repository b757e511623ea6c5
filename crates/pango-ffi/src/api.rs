//! Typed function tables for the three native libraries.
//!
//! Each table is declared once with `native_api!`, which generates the struct
//! of function pointers, a loader that binds every symbol from a dynamically
//! opened library, and (with the `linked` feature) a constructor that takes
//! the same symbols from the libraries linked at build time.

use crate::error::{BindError, Result};
use crate::sys::*;
use libloading::Library;
use std::ffi::{c_char, c_int};

macro_rules! native_api {
    (
        $(#[$meta:meta])*
        pub struct $name:ident ($library:literal) {
            $(
                fn $func:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            $(
                pub $func: unsafe extern "C" fn($($ty),*) $(-> $ret)?,
            )*
        }

        impl $name {
            /// Logical name of the library that provides this table.
            pub const LIBRARY: &'static str = $library;

            /// Bind every symbol of the table from `lib`.
            ///
            /// The library must outlive the returned table.
            pub(crate) fn load(lib: &Library) -> Result<Self> {
                unsafe {
                    Ok(Self {
                        $(
                            $func: *lib
                                .get::<unsafe extern "C" fn($($ty),*) $(-> $ret)?>(
                                    stringify!($func).as_bytes(),
                                )
                                .map_err(|e| BindError::SymbolNotFound {
                                    library: $library.to_string(),
                                    symbol: stringify!($func).to_string(),
                                    reason: e.to_string(),
                                })?,
                        )*
                    })
                }
            }

            /// Table backed by the libraries linked at build time.
            #[cfg(feature = "linked")]
            pub(crate) fn linked() -> Self {
                unsafe extern "C" {
                    $(
                        fn $func($($arg: $ty),*) $(-> $ret)?;
                    )*
                }

                Self {
                    $( $func, )*
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("library", &$library)
                    $( .field(stringify!($func), &(self.$func as *const ())) )*
                    .finish()
            }
        }
    };
}

native_api! {
    /// Functions exported by the Pango text engine.
    pub struct PangoApi("pango") {
        fn pango_version() -> c_int;
        fn pango_version_string() -> *const c_char;
        fn pango_version_check(
            required_major: c_int,
            required_minor: c_int,
            required_micro: c_int,
        ) -> *const c_char;

        fn pango_units_from_double(d: f64) -> c_int;
        fn pango_units_to_double(i: c_int) -> f64;

        fn pango_context_new() -> *mut PangoContext;
        fn pango_context_get_font_map(context: *mut PangoContext) -> *mut PangoFontMap;
        fn pango_layout_new(context: *mut PangoContext) -> *mut PangoLayout;
        fn pango_layout_get_context(layout: *mut PangoLayout) -> *mut PangoContext;
        fn pango_layout_set_text(layout: *mut PangoLayout, text: *const c_char, length: c_int);
        fn pango_layout_get_text(layout: *mut PangoLayout) -> *const c_char;

        fn pango_font_description_new() -> *mut PangoFontDescription;
        fn pango_font_description_from_string(s: *const c_char) -> *mut PangoFontDescription;
        fn pango_font_description_copy(desc: *const PangoFontDescription) -> *mut PangoFontDescription;
        fn pango_font_description_free(desc: *mut PangoFontDescription);
        fn pango_font_description_to_string(desc: *const PangoFontDescription) -> *mut c_char;

        fn pango_attr_list_new() -> *mut PangoAttrList;
        fn pango_attr_list_ref(list: *mut PangoAttrList) -> *mut PangoAttrList;
        fn pango_attr_list_unref(list: *mut PangoAttrList);

        fn pango_tab_array_new(initial_size: gint, positions_in_pixels: gboolean) -> *mut PangoTabArray;
        fn pango_tab_array_copy(src: *mut PangoTabArray) -> *mut PangoTabArray;
        fn pango_tab_array_free(tab_array: *mut PangoTabArray);

        fn pango_language_from_string(language: *const c_char) -> *mut PangoLanguage;
        fn pango_language_to_string(language: *mut PangoLanguage) -> *const c_char;
        fn pango_language_get_default() -> *mut PangoLanguage;
    }
}

native_api! {
    /// Functions exported by the GObject runtime.
    pub struct GObjectApi("gobject") {
        fn g_object_ref(object: gpointer) -> gpointer;
        fn g_object_unref(object: gpointer);
        fn g_object_ref_sink(object: gpointer) -> gpointer;
        fn g_object_is_floating(object: gpointer) -> gboolean;
        fn g_type_name_from_instance(instance: *mut GTypeInstance) -> *const c_char;
    }
}

native_api! {
    /// Functions exported by GLib.
    pub struct GLibApi("glib") {
        fn g_free(mem: gpointer);
        fn glib_check_version(
            required_major: guint,
            required_minor: guint,
            required_micro: guint,
        ) -> *const c_char;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_know_their_library() {
        assert_eq!(PangoApi::LIBRARY, "pango");
        assert_eq!(GObjectApi::LIBRARY, "gobject");
        assert_eq!(GLibApi::LIBRARY, "glib");
    }
}
