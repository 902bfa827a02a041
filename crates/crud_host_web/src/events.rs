//! Bridge between [`GlobalEvent`] and window-level `CustomEvent`s.

use crud_contract::GlobalEvent;
use crud_host::EventBus;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
/// Dispatches events on `window` so non-Leptos code can listen too.
pub struct WindowEventBus;

impl EventBus for WindowEventBus {
    fn dispatch(&self, event: &GlobalEvent) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Err(err) = dispatch_window_event(event) {
                web_sys::console::warn_1(
                    &format!("{} dispatch failed: {err}", event.event_name()).into(),
                );
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = event;
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn dispatch_window_event(event: &GlobalEvent) -> Result<(), String> {
    use serde::Serialize;

    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let detail = event
        .detail()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())?;
    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    let custom = web_sys::CustomEvent::new_with_event_init_dict(event.event_name(), &init)
        .map_err(|err| format!("{err:?}"))?;
    window
        .dispatch_event(&custom)
        .map(|_| ())
        .map_err(|err| format!("{err:?}"))
}

/// JSON `detail` of a DOM event; plain `Event`s and undecodable details yield `null`.
pub fn event_detail(event: &web_sys::Event) -> Value {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        event
            .dyn_ref::<web_sys::CustomEvent>()
            .map(web_sys::CustomEvent::detail)
            .filter(|detail| !detail.is_undefined() && !detail.is_null())
            .and_then(|detail| serde_wasm_bindgen::from_value(detail).ok())
            .unwrap_or(Value::Null)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = event;
        Value::Null
    }
}

/// Typed view of a window event named `name`.
pub fn parse_window_event(name: &str, event: &web_sys::Event) -> Option<GlobalEvent> {
    GlobalEvent::from_parts(name, &event_detail(event))
}
