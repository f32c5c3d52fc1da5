// Wall-clock milliseconds since the Unix epoch.
// std::time::SystemTime panics on wasm32-unknown-unknown, so the browser build
// reads performance.timeOrigin + performance.now() instead.

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin() + p.now())
        .unwrap_or(0.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
