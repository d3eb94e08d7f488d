//! Console logging shim.
//!
//! On wasm32 everything goes to the browser console via `web_sys::console`.
//! Native builds (tests, tooling) print to stderr instead.

/// Informational message (`console.log`).
pub fn info(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("Garden Idle: {msg}").into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[garden-idle] {msg}");
}

/// Something went wrong but the game carries on (`console.warn`).
pub fn warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("Garden Idle: {msg}").into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[garden-idle] warning: {msg}");
}
