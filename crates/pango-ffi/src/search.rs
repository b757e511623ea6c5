//! Platform library search, the equivalent of asking the system where a
//! shared library with a given name lives.
//!
//! Directories are scanned in order: caller-supplied directories, the
//! loader's path variable, then the platform defaults. Within a directory an
//! unversioned file wins over versioned sonames.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered list of directories scanned by [`LibrarySearch::find_library`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySearch {
    dirs: Vec<PathBuf>,
}

impl LibrarySearch {
    /// Search exactly the given directories.
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut seen = HashSet::new();
        let dirs = dirs
            .into_iter()
            .filter(|d| !d.as_os_str().is_empty() && seen.insert(d.clone()))
            .collect();
        Self { dirs }
    }

    /// Loader path variable directories followed by the platform defaults.
    pub fn system() -> Self {
        Self::with_extra_dirs(Vec::new())
    }

    /// `extra` directories first, then everything [`LibrarySearch::system`]
    /// would scan.
    pub fn with_extra_dirs(extra: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut dirs: Vec<PathBuf> = extra.into_iter().collect();
        dirs.extend(loader_path_dirs());
        dirs.extend(default_dirs());
        Self::new(dirs)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a library name (without platform suffix) to a file.
    ///
    /// A path-like name is returned as-is when it names an existing file.
    pub fn find_library(&self, name: &str) -> Option<PathBuf> {
        if is_path_like(name) {
            let path = PathBuf::from(name);
            return path.is_file().then_some(path);
        }

        self.dirs.iter().find_map(|dir| find_in_dir(dir, name))
    }
}

/// Whether a candidate names a filesystem location rather than a bare
/// library name.
pub(crate) fn is_path_like(name: &str) -> bool {
    name.contains('/') || (cfg!(windows) && name.contains('\\'))
}

fn find_in_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Some(exact);
    }

    for suffix in plain_suffixes() {
        let candidate = dir.join(format!("{name}{suffix}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let mut versioned: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| is_versioned_name(f, name))
                && path.is_file()
        })
        .collect();
    versioned.sort();
    versioned.into_iter().next()
}

fn plain_suffixes() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &[".dll"]
    } else if cfg!(target_os = "macos") {
        &[".dylib", ".so"]
    } else {
        &[".so"]
    }
}

fn is_version_tail(tail: &str) -> bool {
    !tail.is_empty()
        && tail.chars().all(|c| c.is_ascii_digit() || c == '.')
        && !tail.starts_with('.')
        && !tail.ends_with('.')
}

/// `libfoo.so.0.42` on ELF platforms, `libfoo.0.dylib` on macOS.
fn is_versioned_name(file_name: &str, name: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(name) else {
        return false;
    };

    if cfg!(target_os = "macos") {
        rest.strip_prefix('.')
            .and_then(|r| r.strip_suffix(".dylib"))
            .is_some_and(is_version_tail)
    } else if cfg!(target_os = "windows") {
        false
    } else {
        rest.strip_prefix(".so.").is_some_and(is_version_tail)
    }
}

fn env_dirs(var: &str) -> Vec<PathBuf> {
    std::env::var_os(var)
        .map(|v| std::env::split_paths(&v).collect())
        .unwrap_or_default()
}

fn loader_path_dirs() -> Vec<PathBuf> {
    if cfg!(target_os = "macos") {
        let mut dirs = env_dirs("DYLD_LIBRARY_PATH");
        dirs.extend(env_dirs("DYLD_FALLBACK_LIBRARY_PATH"));
        dirs
    } else if cfg!(target_os = "windows") {
        env_dirs("PATH")
    } else {
        env_dirs("LD_LIBRARY_PATH")
    }
}

fn default_dirs() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "linux")]
    {
        paths.push(PathBuf::from(format!(
            "/usr/lib/{}-linux-gnu",
            std::env::consts::ARCH
        )));
        paths.push(PathBuf::from(format!("/lib/{}-linux-gnu", std::env::consts::ARCH)));
        if cfg!(target_pointer_width = "64") {
            paths.push(PathBuf::from("/usr/lib64"));
            paths.push(PathBuf::from("/lib64"));
        }
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
        paths.push(PathBuf::from("/lib"));
    }

    #[cfg(target_os = "macos")]
    {
        paths.push(PathBuf::from("/opt/homebrew/lib"));
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
    }

    #[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
    {
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
        paths.push(PathBuf::from("/lib"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn new_drops_duplicates_and_empty_entries() {
        let search = LibrarySearch::new(vec![
            PathBuf::from("/a"),
            PathBuf::new(),
            PathBuf::from("/b"),
            PathBuf::from("/a"),
        ]);
        assert_eq!(search.dirs(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn extra_dirs_come_first() {
        let search = LibrarySearch::with_extra_dirs(vec![PathBuf::from("/custom/path")]);
        assert_eq!(search.dirs()[0], PathBuf::from("/custom/path"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn platform_defaults_present() {
        let search = LibrarySearch::system();
        assert!(search.dirs().iter().any(|p| p == Path::new("/usr/lib")));
    }

    #[test]
    fn missing_library_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let search = LibrarySearch::new(vec![dir.path().to_path_buf()]);
        assert_eq!(search.find_library("libnonexistent_xyz"), None);
    }

    #[test]
    fn exact_file_name_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "libpango-1.0-0.dll");
        let search = LibrarySearch::new(vec![dir.path().to_path_buf()]);
        assert_eq!(search.find_library("libpango-1.0-0.dll"), Some(path));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn versioned_soname_matches() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "libglib-2.0.so.0.8000.0");
        let soname = touch(dir.path(), "libglib-2.0.so.0");
        touch(dir.path(), "libglib-2.0.so.bak");

        let search = LibrarySearch::new(vec![dir.path().to_path_buf()]);
        assert_eq!(search.find_library("libglib-2.0"), Some(soname));
        // The bare variant must not match the prefixed file.
        assert_eq!(search.find_library("glib-2.0"), None);
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn unversioned_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "libpango-1.0.so.0");
        let plain = touch(dir.path(), "libpango-1.0.so");

        let search = LibrarySearch::new(vec![dir.path().to_path_buf()]);
        assert_eq!(search.find_library("libpango-1.0"), Some(plain));
    }

    #[test]
    fn earlier_directory_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let name = format!("libgobject-2.0{}", plain_suffixes()[0]);
        let expected = touch(first.path(), &name);
        touch(second.path(), &name);

        let search = LibrarySearch::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(search.find_library("libgobject-2.0"), Some(expected));
    }

    #[test]
    fn path_like_names_are_checked_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "custom-pango");
        let search = LibrarySearch::new(Vec::new());

        let name = path.to_str().unwrap();
        assert_eq!(search.find_library(name), Some(path.clone()));
        assert_eq!(search.find_library("/nonexistent/path"), None);
    }

    #[test]
    fn version_tail_rules() {
        assert!(is_version_tail("0"));
        assert!(is_version_tail("0.5000.1"));
        assert!(!is_version_tail(""));
        assert!(!is_version_tail("0."));
        assert!(!is_version_tail("bak"));
    }
}
