//! The process-wide foreign interface surface.
//!
//! Binding happens once per process, on first use, in one of two ways:
//! - **Linked**: the `linked` feature compiled the libraries in, and the
//!   `PANGOFFI_API_MODE` toggle has not disabled it.
//! - **Dynamic**: `pango`, `gobject` and `glib` are resolved and opened at
//!   runtime by the [`Resolver`].
//!
//! Linked mode being unavailable is normal and falls through to dynamic mode
//! silently. Once bound, the surface and its libraries live until the
//! process exits.

use crate::api::{GLibApi, GObjectApi, PangoApi};
use crate::error::{BindError, LibraryOpenWarning, Result};
use crate::resolver::{LibrarySpec, NativeLibrary, Resolver};
use crate::search::LibrarySearch;
use once_cell::sync::OnceCell;
use pango_config::{BindingConfig, LIBRARY_NAMES};

static SURFACE: OnceCell<Surface> = OnceCell::new();

/// How the surface was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Symbols linked into the binary at build time.
    Linked,
    /// Libraries opened at runtime.
    Dynamic,
}

/// Typed function tables for Pango, GObject and GLib.
#[derive(Debug)]
pub struct Surface {
    mode: BindingMode,
    pango: PangoApi,
    gobject: GObjectApi,
    glib: GLibApi,
    // Keeps the tables' code mapped; never dropped while the process runs.
    libraries: Vec<NativeLibrary>,
    warnings: Vec<LibraryOpenWarning>,
}

impl Surface {
    /// Bind the surface using configuration from `pangoffi.toml` and the
    /// environment, or return the already bound surface.
    pub fn init() -> Result<&'static Surface> {
        if let Some(surface) = SURFACE.get() {
            return Ok(surface);
        }
        let config = BindingConfig::load()?;
        Self::init_with(&config)
    }

    /// Bind the surface with an explicit configuration.
    ///
    /// Only the first successful call binds; later calls return the same
    /// surface and ignore `config`. Concurrent callers block until the first
    /// finishes. A failed attempt leaves the surface unbound.
    pub fn init_with(config: &BindingConfig) -> Result<&'static Surface> {
        SURFACE.get_or_try_init(|| Self::bind(config))
    }

    /// The surface, if it has been bound.
    pub fn get() -> Option<&'static Surface> {
        SURFACE.get()
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.mode
    }

    pub fn pango(&self) -> &PangoApi {
        &self.pango
    }

    pub fn gobject(&self) -> &GObjectApi {
        &self.gobject
    }

    pub fn glib(&self) -> &GLibApi {
        &self.glib
    }

    /// Libraries opened in dynamic mode, in load order. Empty when linked.
    pub fn libraries(&self) -> &[NativeLibrary] {
        &self.libraries
    }

    /// Location overrides that failed while binding.
    pub fn warnings(&self) -> &[LibraryOpenWarning] {
        &self.warnings
    }

    fn bind(config: &BindingConfig) -> Result<Surface> {
        if config.binding.api_mode {
            if let Some(surface) = Self::bind_linked() {
                log::info!("bound Pango via the linked binding");
                return Ok(surface);
            }
            log::debug!("linked binding not available, resolving libraries at runtime");
        } else {
            log::debug!("linked binding disabled, resolving libraries at runtime");
        }

        Self::bind_dynamic(config)
    }

    #[cfg(feature = "linked")]
    fn bind_linked() -> Option<Surface> {
        Some(Surface {
            mode: BindingMode::Linked,
            pango: PangoApi::linked(),
            gobject: GObjectApi::linked(),
            glib: GLibApi::linked(),
            libraries: Vec::new(),
            warnings: Vec::new(),
        })
    }

    #[cfg(not(feature = "linked"))]
    fn bind_linked() -> Option<Surface> {
        None
    }

    fn bind_dynamic(config: &BindingConfig) -> Result<Surface> {
        let resolver = Resolver::new(LibrarySearch::with_extra_dirs(
            config.search.paths.iter().cloned(),
        ));

        let mut warnings = Vec::new();
        let mut open = |name: &str| -> Result<NativeLibrary> {
            let spec = config
                .libraries
                .get(name)
                .and_then(|lib| LibrarySpec::from_config(name, lib))
                .ok_or_else(|| BindError::LibraryNotFound {
                    library: name.to_string(),
                    attempted: Vec::new(),
                })?;
            let resolution = resolver.resolve(&spec)?;
            warnings.extend(resolution.warnings);
            Ok(resolution.library)
        };

        let [pango_name, gobject_name, glib_name] = LIBRARY_NAMES;
        let pango_lib = open(pango_name)?;
        let gobject_lib = open(gobject_name)?;
        let glib_lib = open(glib_name)?;

        let pango = PangoApi::load(pango_lib.library())?;
        let gobject = GObjectApi::load(gobject_lib.library())?;
        let glib = GLibApi::load(glib_lib.library())?;

        Ok(Surface {
            mode: BindingMode::Dynamic,
            pango,
            gobject,
            glib,
            libraries: vec![pango_lib, gobject_lib, glib_lib],
            warnings,
        })
    }
}
