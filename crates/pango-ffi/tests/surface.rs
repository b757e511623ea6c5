//! These tests bind the real Pango, GObject and GLib libraries, so they are
//! ignored by default. Run with `cargo test -- --ignored` on a machine with
//! Pango installed.

use anyhow::Result;
use pango_ffi::sys::{GObject, PangoContext, PangoFontDescription, PangoLayout};
use pango_ffi::{BindingConfig, BindingMode, Handle, Surface, Version};
use std::ffi::CString;

fn surface() -> Result<&'static Surface> {
    let _ = env_logger::builder().is_test(true).try_init();
    Ok(Surface::init_with(&BindingConfig::default())?)
}

fn ref_count(handle: &Handle<PangoContext>) -> Result<u32> {
    let object = handle.unwrap()?.cast::<GObject>();
    Ok(unsafe { (*object).ref_count })
}

#[test]
#[ignore = "requires the pango, gobject and glib shared libraries"]
fn init_is_idempotent() -> Result<()> {
    let first = surface()?;
    let second = Surface::init_with(&BindingConfig::default())?;
    let third = Surface::init()?;

    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(first, third));
    assert!(std::ptr::eq(first, Surface::get().expect("bound")));

    if first.binding_mode() == BindingMode::Dynamic {
        let names: Vec<&str> = first.libraries().iter().map(|l| l.name()).collect();
        assert_eq!(names, ["pango", "gobject", "glib"]);
    }
    Ok(())
}

#[test]
#[ignore = "requires the pango, gobject and glib shared libraries"]
fn version_query() -> Result<()> {
    let surface = surface()?;
    let version = surface.version();

    assert_eq!(version.major, 1);
    assert_eq!(surface.version_string(), version.to_string());
    assert_eq!(surface.version_check(Version::new(1, 0, 0)), None);
    assert!(surface.version_check(Version::new(99, 0, 0)).is_some());
    Ok(())
}

#[test]
#[ignore = "requires the pango, gobject and glib shared libraries"]
fn gobject_references_follow_handles() -> Result<()> {
    let surface = surface()?;

    let context = Handle::wrap_full(unsafe { (surface.pango().pango_context_new)() })?;
    assert_eq!(ref_count(&context)?, 1);

    let shared = context.share()?;
    assert_eq!(shared, context);
    assert_eq!(ref_count(&context)?, 2);

    let mut shared = shared;
    shared.release()?;
    assert!(shared.release().is_err());
    assert_eq!(ref_count(&context)?, 1);

    // A non-owning view of an accessor result leaves the count alone.
    let layout = Handle::<PangoLayout>::wrap_full(unsafe {
        (surface.pango().pango_layout_new)(context.unwrap()?)
    })?;
    let before = ref_count(&context)?;
    {
        let view = Handle::<PangoContext>::wrap_none(unsafe {
            (surface.pango().pango_layout_get_context)(layout.unwrap()?)
        })?;
        assert_eq!(view, context);
    }
    assert_eq!(ref_count(&context)?, before);
    Ok(())
}

#[test]
#[ignore = "requires the pango, gobject and glib shared libraries"]
fn boxed_copies_are_distinct_objects() -> Result<()> {
    let surface = surface()?;
    let spec = CString::new("Sans Bold 12")?;

    let desc = Handle::<PangoFontDescription>::wrap_full(unsafe {
        (surface.pango().pango_font_description_from_string)(spec.as_ptr())
    })?;
    let copy = desc.share()?;
    assert_ne!(copy, desc);

    let text = unsafe {
        let raw = (surface.pango().pango_font_description_to_string)(copy.unwrap()?);
        let text = pango_ffi::sys::string_from_ptr(raw);
        (surface.glib().g_free)(raw.cast());
        text
    };
    assert_eq!(text.as_deref(), Some("Sans Bold 12"));
    Ok(())
}
