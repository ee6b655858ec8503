//! Preprocessor warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used for problems that do not abort a transform, such as an `@extend`
//! whose target was never required.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings reach stderr at all.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about a non-fatal problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("extend", "main.css: no required rule for `.missing`");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[splice {component}] warning: {message}").yellow());
    }
}

/// Turn warning output on or off (the CLI's `--quiet` flag).
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before transforming another input)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
