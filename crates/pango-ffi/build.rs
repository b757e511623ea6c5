//! Build script for pango-ffi.
//!
//! With the `linked` feature this locates Pango, GObject and GLib through
//! pkg-config and links them directly. Without it the libraries are opened at
//! runtime, so the script only registers the environment it depends on.

fn main() {
    println!("cargo:rerun-if-env-changed=PANGO_LOCATION");
    println!("cargo:rerun-if-env-changed=GOBJECT_LOCATION");
    println!("cargo:rerun-if-env-changed=GLIB_LOCATION");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    #[cfg(feature = "linked")]
    link_system_libraries();
}

#[cfg(feature = "linked")]
fn link_system_libraries() {
    for (package, version) in [("pango", "1.22"), ("gobject-2.0", "2.0"), ("glib-2.0", "2.0")] {
        if let Err(e) = pkg_config::Config::new()
            .atleast_version(version)
            .probe(package)
        {
            panic!("pkg-config could not locate {package} (>= {version}) for the `linked` feature: {e}");
        }
    }
}
