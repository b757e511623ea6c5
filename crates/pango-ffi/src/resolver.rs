//! Library resolution: turns a logical library name and a list of candidate
//! names into an opened shared library.
//!
//! Resolution order, first success wins:
//! 1. the explicit location override (`<NAME>_LOCATION`), whose failure is
//!    only a warning;
//! 2. every candidate, bare and with the `lib` prefix, located through
//!    [`LibrarySearch`] or handed to the dynamic loader as-is;
//! 3. otherwise [`BindError::LibraryNotFound`] naming every attempt.

use crate::error::{BindError, LibraryOpenWarning, Result};
use crate::search::{is_path_like, LibrarySearch};
use libloading::Library;
use pango_config::LibraryConfig;
use std::path::{Path, PathBuf};

/// Prefix tried in front of every bare candidate name.
pub const LIBRARY_PREFIX: &str = "lib";

/// Opens a shared library. The seam exists so resolution order can be
/// exercised without real libraries on disk.
pub trait DynamicLoader {
    type Library;

    fn open(&self, target: &Path) -> std::result::Result<Self::Library, String>;
}

/// The platform dynamic loader (`dlopen` / `LoadLibrary`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoader;

impl DynamicLoader for SystemLoader {
    type Library = Library;

    fn open(&self, target: &Path) -> std::result::Result<Library, String> {
        // Loading runs the library's initializers; the libraries opened here
        // are the system's own Pango/GObject/GLib.
        unsafe { Library::new(target) }.map_err(|e| e.to_string())
    }
}

/// What to resolve: a logical name plus its candidate file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySpec {
    pub name: String,
    pub candidates: Vec<String>,
    pub location: Option<PathBuf>,
}

impl LibrarySpec {
    pub fn new(name: impl Into<String>, candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Built-in spec for one of the three logical libraries.
    pub fn builtin(name: &str) -> Option<Self> {
        let (base, soname): (&[&str], &str) = match name {
            "pango" => (&["pango", "pango-1", "pango-1.0", "pango-1.0-0"], "pango-1.0"),
            "gobject" => (&["gobject-2.0", "gobject-2.0-0"], "gobject-2.0"),
            "glib" => (&["glib-2.0", "glib-2.0-0"], "glib-2.0"),
            _ => return None,
        };

        let mut candidates: Vec<String> = base.iter().map(|s| s.to_string()).collect();
        if cfg!(target_os = "macos") {
            candidates.push(format!("{soname}.0.dylib"));
        } else if cfg!(all(unix, not(target_os = "macos"))) {
            candidates.push(format!("{soname}.so.0"));
        }
        Some(Self::new(name, candidates))
    }

    /// Built-in spec with configured names tried first and the configured
    /// location as the override.
    pub fn from_config(name: &str, config: &LibraryConfig) -> Option<Self> {
        let builtin = Self::builtin(name)?;
        let mut candidates = config.names.clone();
        candidates.extend(
            builtin
                .candidates
                .into_iter()
                .filter(|c| !config.names.contains(c)),
        );
        Some(Self {
            name: builtin.name,
            candidates,
            location: config.location.clone(),
        })
    }
}

/// One opened shared library.
pub struct NativeLibrary<L = Library> {
    name: String,
    target: PathBuf,
    library: L,
}

impl<L> NativeLibrary<L> {
    /// Logical name, e.g. `pango`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path or loader name that was opened.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn library(&self) -> &L {
        &self.library
    }
}

impl<L> std::fmt::Debug for NativeLibrary<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug)]
pub struct Resolution<L = Library> {
    pub library: NativeLibrary<L>,
    /// Override failures encountered on the way.
    pub warnings: Vec<LibraryOpenWarning>,
}

/// Bare name first, then the prefixed one. Paths are only tried as given.
pub fn name_variants(name: &str) -> Vec<String> {
    if is_path_like(name) {
        vec![name.to_string()]
    } else {
        vec![name.to_string(), format!("{LIBRARY_PREFIX}{name}")]
    }
}

/// Resolves logical libraries against a search path and a loader.
#[derive(Debug, Clone)]
pub struct Resolver<D = SystemLoader> {
    loader: D,
    search: LibrarySearch,
}

impl Resolver<SystemLoader> {
    pub fn new(search: LibrarySearch) -> Self {
        Self::with_loader(SystemLoader, search)
    }
}

impl<D: DynamicLoader> Resolver<D> {
    pub fn with_loader(loader: D, search: LibrarySearch) -> Self {
        Self { loader, search }
    }

    pub fn search(&self) -> &LibrarySearch {
        &self.search
    }

    pub fn resolve(&self, spec: &LibrarySpec) -> Result<Resolution<D::Library>> {
        let mut warnings = Vec::new();
        let mut names = spec.candidates.clone();

        if let Some(location) = &spec.location {
            log::debug!("{}: trying location override {}", spec.name, location.display());
            match self.loader.open(location) {
                Ok(library) => {
                    log::info!("{}: loaded from {}", spec.name, location.display());
                    return Ok(Resolution {
                        library: NativeLibrary {
                            name: spec.name.clone(),
                            target: location.clone(),
                            library,
                        },
                        warnings,
                    });
                }
                Err(reason) => {
                    let warning = LibraryOpenWarning {
                        library: spec.name.clone(),
                        location: location.clone(),
                        reason,
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                    names.push(location.to_string_lossy().into_owned());
                }
            }
        }

        let mut attempted: Vec<String> = Vec::new();
        for name in &names {
            for variant in name_variants(name) {
                if attempted.contains(&variant) {
                    continue;
                }
                attempted.push(variant.clone());

                let target = match self.search.find_library(&variant) {
                    Some(path) => path,
                    None => PathBuf::from(&variant),
                };

                match self.loader.open(&target) {
                    Ok(library) => {
                        log::info!("{}: loaded {}", spec.name, target.display());
                        return Ok(Resolution {
                            library: NativeLibrary {
                                name: spec.name.clone(),
                                target,
                                library,
                            },
                            warnings,
                        });
                    }
                    Err(reason) => {
                        log::debug!("{}: {} failed: {}", spec.name, target.display(), reason);
                    }
                }
            }
        }

        Err(BindError::LibraryNotFound {
            library: spec.name.clone(),
            attempted,
        })
    }
}
