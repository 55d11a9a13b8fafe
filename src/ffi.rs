//! FFI bindings for Folio Interact
//!
//! C-compatible entry points for hosts that embed the runtime (a webview shell,
//! a native test harness). Strings in and out are null-terminated UTF-8; every
//! returned string must be freed with `folio_free_string`. Tracked events are
//! handed back as JSON arrays after each call that may produce them.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::InteractConfig;
use crate::events::PageEvent;
use crate::form::ContactSubmission;
use crate::runtime::PortfolioRuntime;
use crate::tracker::MemorySink;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn to_json_cstr<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Validate a contact submission (`{name, email, subject, message}`) and return
/// the validation report as JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `folio_free_string`.
/// - Returns NULL on error; call `folio_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn folio_validate_form(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json_str) = cstr_to_string(json) else {
        set_last_error("Invalid JSON string pointer");
        return ptr::null_mut();
    };

    match serde_json::from_str::<ContactSubmission>(&json_str) {
        Ok(submission) => to_json_cstr(&submission.validate(&InteractConfig::default().form)),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Runtime API
// ============================================================================

/// Opaque handle to a page runtime and its captured events
pub struct FolioRuntimeHandle {
    runtime: PortfolioRuntime,
    events: MemorySink,
}

impl FolioRuntimeHandle {
    fn drain_json(&self) -> *mut c_char {
        to_json_cstr(&self.events.drain())
    }
}

/// Create a runtime from a page description and optional configuration JSON.
///
/// # Safety
/// - `page_json` must be a valid null-terminated C string.
/// - `config_json` may be NULL for defaults.
/// - Must be freed with `folio_runtime_free`.
/// - Returns NULL on error; call `folio_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_new(
    page_json: *const c_char,
    config_json: *const c_char,
) -> *mut FolioRuntimeHandle {
    clear_last_error();

    let Some(page_str) = cstr_to_string(page_json) else {
        set_last_error("Invalid page string pointer");
        return ptr::null_mut();
    };

    let config = match cstr_to_string(config_json) {
        Some(json) => match InteractConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
        None => InteractConfig::default(),
    };

    let events = MemorySink::new();
    let builder = PortfolioRuntime::builder().config(config).sink(events.clone());

    match PortfolioRuntime::from_json(&page_str, builder) {
        Ok(runtime) => Box::into_raw(Box::new(FolioRuntimeHandle { runtime, events })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a runtime.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `folio_runtime_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_free(handle: *mut FolioRuntimeHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Dispatch one page event (JSON) and return the events tracked since the
/// previous call as a JSON array.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `folio_runtime_new`.
/// - `event_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `folio_free_string`.
/// - Returns NULL on error; call `folio_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_dispatch(
    handle: *mut FolioRuntimeHandle,
    event_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null runtime pointer");
        return ptr::null_mut();
    }
    let handle = &mut *handle;

    let Some(event_str) = cstr_to_string(event_json) else {
        set_last_error("Invalid event string pointer");
        return ptr::null_mut();
    };

    match serde_json::from_str::<PageEvent>(&event_str) {
        Ok(event) => {
            handle.runtime.dispatch(event);
            handle.drain_json()
        }
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Advance virtual time by `ms`, firing due timers, and return the events
/// tracked since the previous call as a JSON array.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `folio_runtime_new`.
/// - Returns a newly allocated string that must be freed with `folio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_advance(
    handle: *mut FolioRuntimeHandle,
    ms: u64,
) -> *mut c_char {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null runtime pointer");
        return ptr::null_mut();
    }
    let handle = &mut *handle;

    handle.runtime.advance_by(ms);
    handle.drain_json()
}

/// Events tracked since the previous call, as a JSON array. Useful after
/// `folio_runtime_new`, which tracks `page_load`.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `folio_runtime_new`.
/// - Returns a newly allocated string that must be freed with `folio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_drain_events(handle: *mut FolioRuntimeHandle) -> *mut c_char {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null runtime pointer");
        return ptr::null_mut();
    }

    (*handle).drain_json()
}

/// Current scroll tracking state as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `folio_runtime_new`.
/// - Returns a newly allocated string that must be freed with `folio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn folio_runtime_scroll_state(handle: *const FolioRuntimeHandle) -> *mut c_char {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null runtime pointer");
        return ptr::null_mut();
    }

    to_json_cstr((*handle).runtime.scroll_state())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Folio functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Folio function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn folio_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - The returned pointer is valid until the next Folio call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn folio_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Folio library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn folio_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_json() -> CString {
        CString::new(
            r#"{
                "pathname": "/",
                "viewport": { "inner_height": 1000, "scroll_height": 3000 },
                "body": [
                    { "tag": "section", "id": "home", "top": 0, "height": 1500 },
                    { "tag": "section", "id": "about", "top": 1500, "height": 1500 }
                ]
            }"#,
        )
        .unwrap()
    }

    unsafe fn take_json(ptr: *mut c_char) -> serde_json::Value {
        assert!(!ptr.is_null());
        let value = serde_json::from_str(CStr::from_ptr(ptr).to_str().unwrap()).unwrap();
        folio_free_string(ptr);
        value
    }

    #[test]
    fn test_ffi_validate_form() {
        let json = CString::new(r#"{"name": "A", "email": "a@b.co"}"#).unwrap();

        unsafe {
            let report = take_json(folio_validate_form(json.as_ptr()));
            assert_eq!(report["is_valid"], false);
            assert_eq!(report["errors"].as_array().unwrap().len(), 3);
        }
    }

    #[test]
    fn test_ffi_runtime_lifecycle() {
        let page = page_json();

        unsafe {
            let handle = folio_runtime_new(page.as_ptr(), ptr::null());
            assert!(!handle.is_null());

            let events = take_json(folio_runtime_drain_events(handle));
            assert_eq!(events[0]["action"], "page_load");

            let scroll = CString::new(r#"{"type": "scroll", "y": 1000}"#).unwrap();
            let events = take_json(folio_runtime_dispatch(handle, scroll.as_ptr()));
            assert_eq!(events.as_array().unwrap().len(), 0);

            let events = take_json(folio_runtime_advance(handle, 150));
            assert_eq!(events[0]["action"], "scroll_depth");
            assert_eq!(events[0]["label"], "50%");

            let state = take_json(folio_runtime_scroll_state(handle));
            assert_eq!(state["max_scroll_depth_percent"], 50);
            assert_eq!(state["active_section_id"], "home");

            folio_runtime_free(handle);
        }
    }

    #[test]
    fn test_ffi_advance_saturates() {
        let page = page_json();

        unsafe {
            let handle = folio_runtime_new(page.as_ptr(), ptr::null());
            take_json(folio_runtime_drain_events(handle));

            take_json(folio_runtime_advance(handle, 10));
            let events = take_json(folio_runtime_advance(handle, u64::MAX));
            assert_eq!(events.as_array().unwrap().len(), 0);
            assert!(folio_last_error().is_null());

            folio_runtime_free(handle);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let bad = CString::new("not json").unwrap();

        unsafe {
            assert!(folio_runtime_new(bad.as_ptr(), ptr::null()).is_null());

            let error = folio_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            assert!(folio_runtime_dispatch(ptr::null_mut(), bad.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = folio_version();
            assert!(!version.is_null());
            assert!(!CStr::from_ptr(version).to_str().unwrap().is_empty());
        }
    }
}
