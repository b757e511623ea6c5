//! Pango bindings with runtime library resolution.
//!
//! ```no_run
//! let surface = pangoffi::init()?;
//! println!("bound Pango {}", surface.version());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! See [`pango_ffi`] for the resolution rules and the object handle contract,
//! and [`config`] for `pangoffi.toml` and the environment overrides.

use anyhow::{Context, Result};

pub use pango_config as config;
pub use pango_ffi::*;

/// Bind Pango, GObject and GLib with the configuration from `pangoffi.toml`
/// and the environment. Returns the existing surface if already bound.
pub fn init() -> Result<&'static Surface> {
    if let Some(surface) = Surface::get() {
        return Ok(surface);
    }
    let config = config::BindingConfig::load().context("failed to load pangoffi configuration")?;
    init_with(&config)
}

/// Bind with an explicit configuration.
pub fn init_with(config: &config::BindingConfig) -> Result<&'static Surface> {
    let surface = Surface::init_with(config)
        .context("failed to bind the Pango native libraries (are pango, gobject and glib installed?)")?;

    log::debug!(
        "Pango {} bound in {:?} mode",
        surface.version_string(),
        surface.binding_mode()
    );
    for warning in surface.warnings() {
        log::debug!("while binding: {warning}");
    }
    Ok(surface)
}
