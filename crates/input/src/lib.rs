//! Input state: keyboard and pointer from the platform layer, gamepads, and
//! the default mapping from game actions to keys.
//!
//! # Invariants
//! - Edge queries (`was_*_just_pressed`) compare against the previous frame;
//!   history rolls over in `end_frame`.
//! - Pointer delta is latched in `begin_frame` and is zero in pointer mode.

pub mod action;
pub mod controller;
pub mod input;
pub mod keys;

pub use action::{Action, KeyBindings};
pub use controller::{AnalogJoystick, XboxButton, XboxController};
pub use input::{CursorMode, InputSystem, KeyButtonState, MAX_CONTROLLERS};
pub use keys::KeyCode;
