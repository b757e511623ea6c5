//! Version queries against the bound Pango library.

use crate::surface::Surface;
use crate::sys::string_from_ptr;
use std::ffi::c_int;
use std::fmt;

/// A Pango version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self { major, minor, micro }
    }

    /// `major * 10000 + minor * 100 + micro`, as `PANGO_VERSION_ENCODE` does.
    pub const fn encode(self) -> i32 {
        (self.major * 10000 + self.minor * 100 + self.micro) as i32
    }

    pub const fn decode(encoded: i32) -> Self {
        let encoded = if encoded < 0 { 0 } else { encoded as u32 };
        Self {
            major: encoded / 10000,
            minor: encoded % 10000 / 100,
            micro: encoded % 100,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl Surface {
    /// Version of the Pango library the surface is bound to.
    pub fn version(&self) -> Version {
        Version::decode(unsafe { (self.pango().pango_version)() })
    }

    /// The runtime's own version string, e.g. `"1.50.14"`.
    pub fn version_string(&self) -> String {
        unsafe { string_from_ptr((self.pango().pango_version_string)()) }.unwrap_or_default()
    }

    /// `None` if the bound Pango is compatible with `required`, otherwise the
    /// library's explanation.
    pub fn version_check(&self, required: Version) -> Option<String> {
        let clamp = |v: u32| c_int::try_from(v).unwrap_or(c_int::MAX);
        unsafe {
            string_from_ptr((self.pango().pango_version_check)(
                clamp(required.major),
                clamp(required.minor),
                clamp(required.micro),
            ))
        }
    }
}
