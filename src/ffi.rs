//! FFI bindings for Mindpulse
//!
//! This module provides C-compatible functions for calling Mindpulse from the
//! mobile shell. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `mindpulse_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{TimeZone, Utc};

use crate::config::MonitorConfig;
use crate::pipeline::{score_reading_json, WellnessMonitor};
use crate::types::WellnessSnapshot;

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

fn snapshot_to_cstr(snapshot: &WellnessSnapshot) -> *mut c_char {
    match serde_json::to_string(snapshot) {
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

/// Score one reading JSON and return WellnessScore JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `mindpulse_free_string`.
/// - Returns NULL on error; call `mindpulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_score_json(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match score_reading_json(json_str) {
        Ok(score) => string_to_cstr(&score),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Monitor API
// ============================================================================

/// Opaque handle to a WellnessMonitor
pub struct MonitorHandle {
    monitor: WellnessMonitor,
}

/// Create a new WellnessMonitor.
///
/// Non-positive arguments fall back to the defaults (60 readings, 30 s fresh,
/// 120 s stale).
///
/// # Safety
/// - Returns a pointer to a newly allocated monitor.
/// - Must be freed with `mindpulse_monitor_free`.
/// - Returns NULL on error (e.g. `stale_within_secs` not above `fresh_within_secs`).
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_new(
    history_capacity: i32,
    fresh_within_secs: i64,
    stale_within_secs: i64,
) -> *mut MonitorHandle {
    clear_last_error();

    let defaults = MonitorConfig::default();
    let config = MonitorConfig {
        history_capacity: if history_capacity <= 0 {
            defaults.history_capacity
        } else {
            history_capacity as usize
        },
        fresh_within_secs: if fresh_within_secs <= 0 {
            defaults.fresh_within_secs
        } else {
            fresh_within_secs
        },
        stale_within_secs: if stale_within_secs <= 0 {
            defaults.stale_within_secs
        } else {
            stale_within_secs
        },
    };

    match WellnessMonitor::with_config(config) {
        Ok(monitor) => Box::into_raw(Box::new(MonitorHandle { monitor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a WellnessMonitor.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `mindpulse_monitor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_free(monitor: *mut MonitorHandle) {
    if !monitor.is_null() {
        drop(Box::from_raw(monitor));
    }
}

/// Ingest one reading JSON and return the resulting snapshot JSON.
///
/// `received_at_ms` is the receipt time in Unix milliseconds. Freshness is
/// measured from it; a device `timestamp` in the JSON is reported as
/// `measured_at_utc` only.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `mindpulse_monitor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `mindpulse_free_string`.
/// - Returns NULL on error; call `mindpulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_ingest(
    monitor: *mut MonitorHandle,
    json: *const c_char,
    received_at_ms: i64,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *monitor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let received_at = match Utc.timestamp_millis_opt(received_at_ms).single() {
        Some(at) => at,
        None => {
            set_last_error("Invalid receipt timestamp");
            return ptr::null_mut();
        }
    };

    match handle.monitor.ingest_json(&json_str, received_at) {
        Ok(snapshot) => snapshot_to_cstr(&snapshot),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Snapshot the latest reading as seen at `now_ms` (Unix milliseconds).
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `mindpulse_monitor_new`.
/// - Returns a newly allocated string that must be freed with `mindpulse_free_string`.
/// - Returns NULL on error; call `mindpulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_snapshot(
    monitor: *mut MonitorHandle,
    now_ms: i64,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &*monitor;

    match Utc.timestamp_millis_opt(now_ms).single() {
        Some(now) => snapshot_to_cstr(&handle.monitor.snapshot_at(now)),
        None => {
            set_last_error("Invalid snapshot timestamp");
            ptr::null_mut()
        }
    }
}

/// Save monitor history to JSON.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `mindpulse_monitor_new`.
/// - Returns a newly allocated string that must be freed with `mindpulse_free_string`.
/// - Returns NULL on error; call `mindpulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_save_history(
    monitor: *mut MonitorHandle,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &*monitor;

    match handle.monitor.save_history() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load monitor history from JSON.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `mindpulse_monitor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `mindpulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_monitor_load_history(
    monitor: *mut MonitorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return -1;
    }

    let handle = &mut *monitor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.monitor.load_history(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Mindpulse functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Mindpulse function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a static string that is valid until the next call
///   to any Mindpulse function on the same thread.
/// - Returns NULL if there was no error.
/// - Do NOT free the returned pointer.
#[no_mangle]
pub unsafe extern "C" fn mindpulse_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}
