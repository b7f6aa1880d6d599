//! # Utility Functions Module
//!
//! Small helpers for building external command lines.
//!
//! Arguments are kept as `OsString` end to end: file names that are not valid
//! UTF-8 reach ffmpeg byte for byte.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A value that can be passed as one process argument
pub trait CommandArg {
    fn to_arg(&self) -> OsString;
}

impl CommandArg for str {
    fn to_arg(&self) -> OsString {
        OsString::from(self)
    }
}

impl CommandArg for String {
    fn to_arg(&self) -> OsString {
        OsString::from(self.as_str())
    }
}

impl CommandArg for OsStr {
    fn to_arg(&self) -> OsString {
        self.to_os_string()
    }
}

impl CommandArg for Path {
    fn to_arg(&self) -> OsString {
        self.as_os_str().to_os_string()
    }
}

impl CommandArg for PathBuf {
    fn to_arg(&self) -> OsString {
        self.as_os_str().to_os_string()
    }
}

macro_rules! display_arg {
    ($($t:ty),*) => {
        $(impl CommandArg for $t {
            fn to_arg(&self) -> OsString {
                OsString::from(self.to_string())
            }
        })*
    };
}

display_arg!(u8, u16, u32, u64, usize, f64);

/// Builds a `Vec<OsString>` of command arguments from mixed values.
///
/// ```rust
/// use convert_everything::args;
/// use std::path::Path;
///
/// let fps: u32 = 15;
/// let args = args!["-r", fps, "-i", Path::new("in/clip.mp4")];
/// assert_eq!(args, vec!["-r", "15", "-i", "in/clip.mp4"]);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {{
        #[allow(unused_imports)]
        use $crate::utils::CommandArg as _;
        vec![$($item.to_arg()),*]
    }};
}
