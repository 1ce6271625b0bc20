//! FFI bindings for Calmou core
//!
//! This module provides C-compatible functions for calling the scoring engine
//! and chart renderer from the mobile shell. All functions use C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `calmou_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::chart::ChartLayout;
use crate::config::CalmouConfig;
use crate::error::ComputeError;
use crate::instruments::InstrumentCatalog;
use crate::pipeline::{score_assessment_json, weekly_report_to_chart_json, CalmouEngine};
use crate::types::LevelPolicy;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
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

/// Hand a JSON result to the caller, or record the error and return NULL
fn into_c_result(result: Result<String, ComputeError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

fn policy_from_flag(clamp: i32) -> LevelPolicy {
    if clamp != 0 {
        LevelPolicy::Clamp
    } else {
        LevelPolicy::Reject
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score an assessment against the built-in instruments.
///
/// `answers_json` is an object mapping question ids to option values,
/// e.g. `{"q1": 2, "q2": 0, "q3": 4}`.
///
/// # Safety
/// - `instrument_id` and `answers_json` must be valid null-terminated C strings.
/// - Returns a newly allocated `ScoringResult` JSON string that must be freed with `calmou_free_string`.
/// - Returns NULL on error (including incomplete answers); call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_score_assessment(
    instrument_id: *const c_char,
    answers_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let instrument_str = match cstr_to_string(instrument_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid instrument_id string pointer");
            return ptr::null_mut();
        }
    };

    let answers_str = match cstr_to_string(answers_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid answers JSON string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result(score_assessment_json(
        &InstrumentCatalog::default(),
        &instrument_str,
        &answers_str,
    ))
}

/// Render a weekly mood report into chart geometry JSON.
///
/// The surface is `width` x `height` with the default padding. A non-zero
/// `clamp` pulls out-of-range levels into 1..=5 instead of failing.
///
/// # Safety
/// - `report_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `calmou_free_string`.
/// - Returns NULL on error; call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_render_mood_chart(
    report_json: *const c_char,
    width: f64,
    height: f64,
    clamp: i32,
) -> *mut c_char {
    clear_last_error();

    let report_str = match cstr_to_string(report_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid report JSON string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result(
        ChartLayout::default()
            .resized(width, height)
            .and_then(|layout| {
                weekly_report_to_chart_json(&report_str, &layout, policy_from_flag(clamp))
            }),
    )
}

/// List the built-in instruments as a JSON array.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `calmou_free_string`.
/// - Returns NULL on error; call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_list_instruments() -> *mut c_char {
    clear_last_error();
    into_c_result(CalmouEngine::default().instruments_json())
}

// ============================================================================
// Configured Engine API
// ============================================================================

/// Opaque handle to a CalmouEngine
pub struct CalmouEngineHandle {
    engine: CalmouEngine,
}

/// Create an engine from TOML configuration text.
///
/// # Safety
/// - `config_toml` must be a valid null-terminated C string, or NULL for defaults.
/// - Returns a pointer to a newly allocated engine that must be freed with `calmou_engine_free`.
/// - Returns NULL on error; call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_engine_new(config_toml: *const c_char) -> *mut CalmouEngineHandle {
    clear_last_error();

    let config = if config_toml.is_null() {
        Ok(CalmouConfig::default())
    } else {
        match cstr_to_string(config_toml) {
            Some(s) => CalmouConfig::from_toml(&s),
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        }
    };

    match config.and_then(|c| CalmouEngine::from_config(&c)) {
        Ok(engine) => Box::into_raw(Box::new(CalmouEngineHandle { engine })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `calmou_engine_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn calmou_engine_free(engine: *mut CalmouEngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Score an assessment with the engine's instrument catalog.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `calmou_engine_new`.
/// - `instrument_id` and `answers_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `calmou_free_string`.
/// - Returns NULL on error; call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_engine_score(
    engine: *const CalmouEngineHandle,
    instrument_id: *const c_char,
    answers_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &*engine;

    let instrument_str = match cstr_to_string(instrument_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid instrument_id string pointer");
            return ptr::null_mut();
        }
    };

    let answers_str = match cstr_to_string(answers_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid answers JSON string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result(handle.engine.score_json(&instrument_str, &answers_str))
}

/// Render a weekly report with the engine's layout and level policy.
///
/// Pass a positive finite `width` and `height` to override the configured
/// surface size; any other values keep the configured size.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `calmou_engine_new`.
/// - `report_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `calmou_free_string`.
/// - Returns NULL on error; call `calmou_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn calmou_engine_render_chart(
    engine: *const CalmouEngineHandle,
    report_json: *const c_char,
    width: f64,
    height: f64,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &*engine;

    let report_str = match cstr_to_string(report_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid report JSON string pointer");
            return ptr::null_mut();
        }
    };

    let result = if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        handle.engine.chart_json_sized(&report_str, width, height)
    } else {
        handle.engine.chart_json(&report_str)
    };
    into_c_result(result)
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Calmou functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Calmou function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn calmou_free_string(ptr: *mut c_char) {
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
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Calmou function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn calmou_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Calmou core library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn calmou_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
