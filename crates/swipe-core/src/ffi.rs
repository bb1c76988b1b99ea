//! C ABI bindings (feature `ffi`), for embedding the engine in a host
//! keyboard app written in something other than Rust or WASM. One global
//! engine instance, guarded by a mutex — matches the single-owner
//! scheduling model (spec.md §5) while still being safe to call from a
//! host's UI thread.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::SwipeEngine;

static ENGINE: Lazy<Mutex<SwipeEngine>> = Lazy::new(|| Mutex::new(SwipeEngine::new()));

unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok() }
}

/// Returns 0 on success, -1 on bad UTF-8/null pointer, -2 on load failure.
#[no_mangle]
pub extern "C" fn swipe_engine_load_layout_file(path: *const c_char) -> i32 {
    let Some(path) = (unsafe { cstr_to_str(path) }) else { return -1 };
    let mut engine = ENGINE.lock().unwrap();
    match engine.load_layout(path) {
        Ok(()) => 0,
        Err(err) => {
            tracing::warn!(?err, "ffi load_layout_file failed");
            -2
        }
    }
}

#[no_mangle]
pub extern "C" fn swipe_engine_load_layout_str(json: *const c_char) -> i32 {
    let Some(json) = (unsafe { cstr_to_str(json) }) else { return -1 };
    let mut engine = ENGINE.lock().unwrap();
    match engine.load_layout_from_str(json) {
        Ok(()) => 0,
        Err(err) => {
            tracing::warn!(?err, "ffi load_layout_str failed");
            -2
        }
    }
}

/// `freq_path` may be null (no frequency file).
#[no_mangle]
pub extern "C" fn swipe_engine_load_dictionary(words_path: *const c_char, freq_path: *const c_char) -> i32 {
    let Some(words_path) = (unsafe { cstr_to_str(words_path) }) else { return -1 };
    let freq_path = unsafe { cstr_to_str(freq_path) };
    let mut engine = ENGINE.lock().unwrap();
    match engine.load_dictionary(words_path, freq_path.map(std::path::Path::new)) {
        Ok(()) => 0,
        Err(err) => {
            tracing::warn!(?err, "ffi load_dictionary failed");
            -2
        }
    }
}

/// Map `len` (x, y) pairs to a key sequence, returned as a JSON string
/// array of single-character strings. Caller must free with
/// `swipe_engine_free_string`. Null on a null pointer; `"[]"` for an
/// unloaded layout or an empty/noise-only path.
#[no_mangle]
pub extern "C" fn swipe_engine_map_path(xs: *const f64, ys: *const f64, len: usize) -> *mut c_char {
    if xs.is_null() || ys.is_null() {
        return std::ptr::null_mut();
    }
    let path: Vec<swipe_types::Point> = unsafe {
        std::slice::from_raw_parts(xs, len)
            .iter()
            .zip(std::slice::from_raw_parts(ys, len))
            .map(|(&x, &y)| swipe_types::Point::new(x, y))
            .collect()
    };

    let engine = ENGINE.lock().unwrap();
    let seq = engine.map_path_to_sequence(&path);
    let json = serde_json::to_string(&seq.iter().map(|c| c.to_string()).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_string());
    CString::new(json).map(CString::into_raw).unwrap_or(std::ptr::null_mut())
}

/// `key_seq` is the JSON-less plain string of key ids (e.g. `"the"`).
/// `previous_word` may be null. Returns a JSON array of candidates.
#[no_mangle]
pub extern "C" fn swipe_engine_generate_candidates(
    key_seq: *const c_char,
    previous_word: *const c_char,
) -> *mut c_char {
    let Some(key_seq) = (unsafe { cstr_to_str(key_seq) }) else { return std::ptr::null_mut() };
    let previous_word = unsafe { cstr_to_str(previous_word) };
    let seq: Vec<char> = key_seq.chars().collect();

    let engine = ENGINE.lock().unwrap();
    let candidates = engine.generate_candidates(&seq, previous_word);
    let json = serde_json::to_string(&candidates).unwrap_or_else(|_| "[]".to_string());
    CString::new(json).map(CString::into_raw).unwrap_or(std::ptr::null_mut())
}

#[no_mangle]
pub extern "C" fn swipe_engine_record_commit(word: *const c_char, previous_word: *const c_char) -> i32 {
    let Some(word) = (unsafe { cstr_to_str(word) }) else { return -1 };
    let previous_word = unsafe { cstr_to_str(previous_word) };
    ENGINE.lock().unwrap().record_commit(word, previous_word);
    0
}

#[no_mangle]
pub extern "C" fn swipe_engine_reset() -> i32 {
    match ENGINE.lock().unwrap().reset_user_data() {
        Ok(()) => 0,
        Err(err) => {
            tracing::warn!(?err, "ffi reset failed");
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn swipe_engine_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
