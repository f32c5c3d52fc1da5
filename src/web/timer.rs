//! Owned browser timers.
//!
//! Both guards clear their timer on `cancel()` and on drop. The closure stays
//! alive until the guard is dropped, so cancelling from inside the timer's own
//! callback is safe; only dropping it there is not.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

/// Repeating `setInterval` task.
pub struct Interval {
    handle: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start(period_ms: u32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let handle = win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms as i32,
        )?;
        Ok(Self {
            handle: Some(handle),
            _closure: closure,
        })
    }

    pub fn cancel(&mut self) {
        if let (Some(handle), Some(win)) = (self.handle.take(), window()) {
            win.clear_interval_with_handle(handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One-shot `setTimeout` task.
pub struct Timeout {
    handle: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn start(delay_ms: u32, f: impl FnOnce() + 'static) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut f = Some(f);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(f) = f.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        let handle = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        )?;
        Ok(Self {
            handle: Some(handle),
            _closure: closure,
        })
    }

    pub fn cancel(&mut self) {
        if let (Some(handle), Some(win)) = (self.handle.take(), window()) {
            win.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
