//! FFI version information

use std::ffi::c_char;

static VERSION_CSTR: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Get version string (static, must not be freed)
#[no_mangle]
pub extern "C" fn hostpool_version_string() -> *const c_char {
    VERSION_CSTR.as_ptr() as *const c_char
}
