use std::collections::BTreeMap;

use glam::Vec2;
use protogame_kernel::EngineSubsystem;

use crate::{Action, KeyBindings, KeyCode, XboxController};

pub const MAX_CONTROLLERS: usize = 4;

/// Down state for this frame and the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyButtonState {
    is_down: bool,
    was_down_last_frame: bool,
}

impl KeyButtonState {
    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn was_just_pressed(&self) -> bool {
        self.is_down && !self.was_down_last_frame
    }

    pub fn was_just_released(&self) -> bool {
        !self.is_down && self.was_down_last_frame
    }

    pub(crate) fn set_down(&mut self, down: bool) {
        self.is_down = down;
    }

    pub(crate) fn roll_over(&mut self) {
        self.was_down_last_frame = self.is_down;
    }
}

/// How the OS cursor behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorMode {
    /// Visible, free-moving cursor; no relative delta is reported.
    #[default]
    Pointer,
    /// Hidden, captured cursor reporting relative motion for mouse-look.
    Fps,
}

/// Polled input state for keyboard, pointer and gamepads.
#[derive(Debug, Default)]
pub struct InputSystem {
    keys: BTreeMap<KeyCode, KeyButtonState>,
    controllers: [XboxController; MAX_CONTROLLERS],
    cursor_mode: CursorMode,
    cursor_client_delta: Vec2,
    pending_cursor_motion: Vec2,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_pressed(&mut self, key: KeyCode) {
        self.keys.entry(key).or_default().set_down(true);
    }

    pub fn handle_key_released(&mut self, key: KeyCode) {
        self.keys.entry(key).or_default().set_down(false);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(KeyButtonState::is_down)
    }

    pub fn was_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys
            .get(&key)
            .is_some_and(KeyButtonState::was_just_pressed)
    }

    pub fn was_key_just_released(&self, key: KeyCode) -> bool {
        self.keys
            .get(&key)
            .is_some_and(KeyButtonState::was_just_released)
    }

    pub fn is_action_down(&self, bindings: &KeyBindings, action: Action) -> bool {
        bindings.key(action).is_some_and(|k| self.is_key_down(k))
    }

    pub fn was_action_just_pressed(&self, bindings: &KeyBindings, action: Action) -> bool {
        bindings
            .key(action)
            .is_some_and(|k| self.was_key_just_pressed(k))
    }

    /// Accumulate raw relative pointer motion reported by the platform.
    pub fn add_cursor_motion(&mut self, delta: Vec2) {
        self.pending_cursor_motion += delta;
    }

    /// Pointer motion latched for the current frame.
    pub fn cursor_client_delta(&self) -> Vec2 {
        self.cursor_client_delta
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        if self.cursor_mode != mode {
            tracing::debug!(?mode, "cursor mode changed");
            self.cursor_mode = mode;
        }
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Controller slot `index`; out-of-range indices read the last slot.
    pub fn controller(&self, index: usize) -> &XboxController {
        &self.controllers[index.min(MAX_CONTROLLERS - 1)]
    }

    pub fn controller_mut(&mut self, index: usize) -> &mut XboxController {
        &mut self.controllers[index.min(MAX_CONTROLLERS - 1)]
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for state in self.keys.values_mut() {
            state.set_down(false);
        }
        self.pending_cursor_motion = Vec2::ZERO;
    }
}

impl EngineSubsystem for InputSystem {
    fn name(&self) -> &'static str {
        "input"
    }

    fn begin_frame(&mut self) {
        let motion = std::mem::take(&mut self.pending_cursor_motion);
        self.cursor_client_delta = match self.cursor_mode {
            CursorMode::Fps => motion,
            CursorMode::Pointer => Vec2::ZERO,
        };
    }

    fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            state.roll_over();
        }
        for pad in &mut self.controllers {
            pad.end_frame();
        }
    }

    fn shutdown(&mut self) {
        *self = Self::default();
    }
}
