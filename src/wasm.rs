//! Helpers for WebAssembly builds. Without a hook, panics in the browser only surface as an opaque
//! `unreachable` trap; the hook forwards the message to the console instead.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
