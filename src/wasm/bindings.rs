//! JavaScript bindings for RepSync core types

use crate::pose::{joint_angle, Point2};
use crate::protocol::{decode_server_message, encode_client_message, ClientMessage};
use crate::reps::{RepDetector, RepEvent, RepStage, Thresholds};
use crate::room::{RoomState, SessionPhase};
use crate::sync::UpdateThrottler;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Angle at (bx, by) between the rays to (ax, ay) and (cx, cy), in degrees
#[wasm_bindgen(js_name = jointAngle)]
pub fn joint_angle_js(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    joint_angle(Point2::new(ax, ay), Point2::new(bx, by), Point2::new(cx, cy))
}

/// `{"type":"update","count":n}` frame text
#[wasm_bindgen(js_name = encodeUpdate)]
pub fn encode_update(count: u32) -> Result<String, JsValue> {
    encode_client_message(&ClientMessage::Update { count })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `performance.now()` milliseconds as a duration; invalid input clamps
fn from_millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

/// JavaScript-friendly wrapper for RepDetector
#[wasm_bindgen]
pub struct WasmRepDetector {
    inner: RepDetector,
}

#[wasm_bindgen]
impl WasmRepDetector {
    /// Create a detector with the given thresholds in degrees
    #[wasm_bindgen(constructor)]
    pub fn new(down: f64, up: f64) -> Result<WasmRepDetector, JsValue> {
        let thresholds = Thresholds::new(down, up).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: RepDetector::new(thresholds),
        })
    }

    /// Feed one angle; returns the new count when a rep was recorded
    #[wasm_bindgen(js_name = observe)]
    pub fn observe(&mut self, angle_deg: f64) -> Option<u32> {
        self.inner.observe(angle_deg).map(|RepEvent::CountChanged(count)| count)
    }

    #[wasm_bindgen(js_name = count)]
    pub fn count(&self) -> u32 {
        self.inner.count()
    }

    /// "UP" or "DOWN"
    #[wasm_bindgen(js_name = stage)]
    pub fn stage(&self) -> String {
        match self.inner.stage() {
            RepStage::Up => "UP".to_string(),
            RepStage::Down => "DOWN".to_string(),
        }
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(js_name = disable)]
    pub fn disable(&mut self) {
        self.inner.disable();
    }

    #[wasm_bindgen(js_name = enable)]
    pub fn enable(&mut self) {
        self.inner.enable();
    }
}

/// JavaScript-friendly wrapper for UpdateThrottler
#[wasm_bindgen]
pub struct WasmThrottler {
    inner: UpdateThrottler,
}

#[wasm_bindgen]
impl WasmThrottler {
    #[wasm_bindgen(constructor)]
    pub fn new(heartbeat_ms: f64) -> Self {
        Self {
            inner: UpdateThrottler::new(from_millis(heartbeat_ms)),
        }
    }

    /// Ask only while the socket is open; a true answer records the send
    #[wasm_bindgen(js_name = shouldSend)]
    pub fn should_send(&mut self, count: u32, now_ms: f64) -> bool {
        self.inner.should_send(count, from_millis(now_ms))
    }

    #[wasm_bindgen(js_name = forget)]
    pub fn forget(&mut self) {
        self.inner.forget();
    }
}

/// JavaScript-friendly wrapper for the room snapshot reducer
#[wasm_bindgen]
pub struct WasmRoomState {
    inner: RoomState,
}

impl Default for WasmRoomState {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmRoomState {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: RoomState::new(),
        }
    }

    /// Apply a raw inbound frame. Returns false, leaving the state
    /// untouched, when the frame does not match the protocol.
    #[wasm_bindgen(js_name = applyFrame)]
    pub fn apply_frame(&mut self, text: &str) -> bool {
        match decode_server_message(text) {
            Ok(message) => {
                self.inner = self.inner.apply(message);
                true
            }
            Err(e) => {
                log::warn!("discarding inbound frame: {}", e);
                false
            }
        }
    }

    /// Players in server order as a JSON array string
    #[wasm_bindgen(js_name = playersJSON)]
    pub fn players_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.players())
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    /// Players by rank as a JSON array string
    #[wasm_bindgen(js_name = rankedJSON)]
    pub fn ranked_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.ranked())
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    #[wasm_bindgen(js_name = winnerId)]
    pub fn winner_id(&self) -> Option<String> {
        self.inner.winner().map(|w| w.id.clone())
    }

    #[wasm_bindgen(js_name = isStopped)]
    pub fn is_stopped(&self) -> bool {
        self.inner.phase() == SessionPhase::Stopped
    }
}
