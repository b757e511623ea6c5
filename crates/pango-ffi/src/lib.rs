//! Runtime binding to Pango, GObject and GLib.
//!
//! This crate locates and opens the three native libraries (or uses the ones
//! linked at build time), exposes their functions through typed tables on a
//! process-wide [`Surface`], and wraps the native reference-counted objects
//! they return in owner-aware [`Handle`]s.
//!
//! # Features
//!
//! - `linked`: link the libraries at build time via pkg-config. Runtime
//!   resolution remains the fallback when `PANGOFFI_API_MODE=0`.
//!
//! # Environment
//!
//! - `PANGO_LOCATION`, `GOBJECT_LOCATION`, `GLIB_LOCATION`: exact library to
//!   try first; a failure there is logged and resolution falls back.
//! - `PANGOFFI_API_MODE`: set to `0` to skip the linked binding.

mod api;
mod error;
mod kinds;
mod object;
mod resolver;
mod search;
mod surface;
pub mod sys;
pub mod units;
mod version;

pub use api::{GLibApi, GObjectApi, PangoApi};
pub use error::{BindError, LibraryOpenWarning, ObjectError, Result};
pub use object::{Handle, NativeObject, RefCounted};
pub use resolver::{
    name_variants, DynamicLoader, LibrarySpec, NativeLibrary, Resolution, Resolver, SystemLoader,
    LIBRARY_PREFIX,
};
pub use search::LibrarySearch;
pub use surface::{BindingMode, Surface};
pub use version::Version;

pub use pango_config::BindingConfig;
