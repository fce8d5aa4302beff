//! WASM bindings for RepSync
//!
//! Browser builds keep camera capture and pose inference in JavaScript and
//! call into the detector, throttle and reducer through these wrappers.

#[cfg(feature = "wasm")]
pub mod bindings;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::{WasmRepDetector, WasmRoomState, WasmThrottler};
