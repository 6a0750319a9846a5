//! Developer tooling: the dev console and timed debug-draw primitives.
//!
//! # Invariants
//! - Tools only read game state; they reach the game through the event bus.
//! - Debug primitives age on their own clock, unaffected by game pause.

pub mod debug_render;
pub mod dev_console;

pub use debug_render::{DebugRenderMode, DebugRenderSystem, FOREVER};
pub use dev_console::{DevConsole, DevConsoleLine, DevConsoleMode, HELP_COMMAND};
