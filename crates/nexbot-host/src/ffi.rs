//! C ABI for hosts embedding Nexbot (JNI shims, Python `ctypes`, Swift, ...).
//!
//! Lifecycle:
//!
//! ```text
//! nexbot_assistant_new(config_path)   -> handle (never NULL)
//! nexbot_get_answer(handle, query)    -> owned C string
//! nexbot_get_response(handle, query)  -> owned C string
//! nexbot_string_free(string)
//! nexbot_assistant_free(handle)
//! ```
//!
//! Every export wraps its body in `catch_unwind` so a Rust panic can never
//! unwind into the host runtime. Strings returned to the host are owned by
//! the host and must be released with [`nexbot_string_free`].

use crate::assistant::Assistant;
use nexbot_core::APOLOGY_RESPONSE;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::error;

/// Returned when a host calls in with a NULL handle.
const NOT_READY: &str = "Chat system is initializing. Please try again.";

/// Borrow a C string as UTF-8. NULL and invalid UTF-8 read as `None`.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Hand a Rust string to the host. Interior NULs are dropped.
fn into_c_string(text: String) -> *mut c_char {
    let bytes: Vec<u8> = text.into_bytes().into_iter().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

fn guarded<F: FnOnce() -> String>(name: &str, fallback: &str, f: F) -> *mut c_char {
    let text = catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(export = name, "panic caught at FFI boundary");
        fallback.to_string()
    });
    into_c_string(text)
}

/// Build an assistant from the TOML file at `config_path`, or from the
/// defaults when `config_path` is NULL.
///
/// Load failures leave the assistant in its degraded-but-usable state.
///
/// # Safety
/// `config_path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn nexbot_assistant_new(config_path: *const c_char) -> *mut Assistant {
    let path = read_str(config_path).map(Path::new);
    let built = catch_unwind(AssertUnwindSafe(|| Assistant::from_config_path(path)))
        .or_else(|_| {
            error!("panic while loading assistant, falling back to built-in defaults");
            catch_unwind(|| Assistant::builder().build())
        });
    match built {
        Ok(assistant) => Box::into_raw(Box::new(assistant)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release an assistant created by [`nexbot_assistant_new`].
///
/// # Safety
/// `assistant` must be NULL or a handle from [`nexbot_assistant_new`] that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn nexbot_assistant_free(assistant: *mut Assistant) {
    if !assistant.is_null() {
        drop(Box::from_raw(assistant));
    }
}

/// Best corpus answer for `query`, or an error message in its place.
///
/// # Safety
/// `assistant` must be NULL or a live handle; `query` must be NULL or a valid
/// NUL-terminated string. The result must be freed with [`nexbot_string_free`].
#[no_mangle]
pub unsafe extern "C" fn nexbot_get_answer(
    assistant: *const Assistant,
    query: *const c_char,
) -> *mut c_char {
    let query = read_str(query).unwrap_or_default();
    guarded("nexbot_get_answer", "Error processing your question: internal panic", || {
        match assistant.as_ref() {
            Some(assistant) => assistant.get_answer(query),
            None => NOT_READY.to_string(),
        }
    })
}

/// Conversational reply for `query`.
///
/// # Safety
/// Same contract as [`nexbot_get_answer`].
#[no_mangle]
pub unsafe extern "C" fn nexbot_get_response(
    assistant: *const Assistant,
    query: *const c_char,
) -> *mut c_char {
    let query = read_str(query).unwrap_or_default();
    guarded("nexbot_get_response", APOLOGY_RESPONSE, || match assistant.as_ref() {
        Some(assistant) => assistant.get_response(query),
        None => NOT_READY.to_string(),
    })
}

/// Self test of the corpus pipeline.
///
/// # Safety
/// `assistant` must be NULL or a live handle. The result must be freed with
/// [`nexbot_string_free`].
#[no_mangle]
pub unsafe extern "C" fn nexbot_self_test(assistant: *const Assistant) -> *mut c_char {
    guarded("nexbot_self_test", "Test failed: internal panic", || {
        match assistant.as_ref() {
            Some(assistant) => assistant.self_test(),
            None => format!("Test failed: {NOT_READY}"),
        }
    })
}

/// Library version. The result must be freed with [`nexbot_string_free`].
#[no_mangle]
pub extern "C" fn nexbot_version() -> *mut c_char {
    into_c_string(env!("CARGO_PKG_VERSION").to_string())
}

/// Release a string returned by this library.
///
/// # Safety
/// `text` must be NULL or a pointer returned by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn nexbot_string_free(text: *mut c_char) {
    if !text.is_null() {
        drop(CString::from_raw(text));
    }
}
