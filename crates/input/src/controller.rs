use glam::Vec2;

use crate::KeyButtonState;

/// Digital buttons on an Xbox-layout gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum XboxButton {
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Back,
    Start,
    LeftThumb,
    RightThumb,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl XboxButton {
    pub const COUNT: usize = 14;

    fn index(self) -> usize {
        self as usize
    }
}

/// Analog stick with radial dead-zone correction.
///
/// Raw magnitudes below the inner dead zone read as zero, above the outer
/// dead zone as one, and are remapped linearly in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogJoystick {
    raw: Vec2,
    corrected: Vec2,
    inner_dead_zone: f32,
    outer_dead_zone: f32,
}

impl Default for AnalogJoystick {
    fn default() -> Self {
        Self::new(0.30, 0.95)
    }
}

impl AnalogJoystick {
    pub fn new(inner_dead_zone: f32, outer_dead_zone: f32) -> Self {
        Self {
            raw: Vec2::ZERO,
            corrected: Vec2::ZERO,
            inner_dead_zone,
            outer_dead_zone,
        }
    }

    /// Feed a raw stick reading in -1..=1 on each axis.
    pub fn update_position(&mut self, raw: Vec2) {
        self.raw = raw;
        let magnitude = raw.length();
        let span = (self.outer_dead_zone - self.inner_dead_zone).max(f32::EPSILON);
        let corrected_magnitude = ((magnitude - self.inner_dead_zone) / span).clamp(0.0, 1.0);
        self.corrected = if magnitude > 0.0 {
            raw / magnitude * corrected_magnitude
        } else {
            Vec2::ZERO
        };
    }

    pub fn reset(&mut self) {
        self.raw = Vec2::ZERO;
        self.corrected = Vec2::ZERO;
    }

    /// Dead-zone corrected position.
    pub fn position(&self) -> Vec2 {
        self.corrected
    }

    pub fn raw_position(&self) -> Vec2 {
        self.raw
    }

    pub fn magnitude(&self) -> f32 {
        self.corrected.length()
    }

    pub fn orientation_degrees(&self) -> f32 {
        self.corrected.y.atan2(self.corrected.x).to_degrees()
    }
}

/// State of one gamepad, written by the platform layer each frame.
#[derive(Debug, Clone, Default)]
pub struct XboxController {
    connected: bool,
    left_stick: AnalogJoystick,
    right_stick: AnalogJoystick,
    left_trigger: f32,
    right_trigger: f32,
    buttons: [KeyButtonState; XboxButton::COUNT],
}

impl XboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Disconnecting clears every reading.
    pub fn set_connected(&mut self, connected: bool) {
        if !connected {
            *self = Self::default();
        }
        self.connected = connected;
    }

    pub fn left_stick(&self) -> &AnalogJoystick {
        &self.left_stick
    }

    pub fn right_stick(&self) -> &AnalogJoystick {
        &self.right_stick
    }

    pub fn left_stick_mut(&mut self) -> &mut AnalogJoystick {
        &mut self.left_stick
    }

    pub fn right_stick_mut(&mut self) -> &mut AnalogJoystick {
        &mut self.right_stick
    }

    /// Trigger pull in 0..=1.
    pub fn left_trigger(&self) -> f32 {
        self.left_trigger
    }

    pub fn right_trigger(&self) -> f32 {
        self.right_trigger
    }

    pub fn set_triggers(&mut self, left: f32, right: f32) {
        self.left_trigger = left.clamp(0.0, 1.0);
        self.right_trigger = right.clamp(0.0, 1.0);
    }

    pub fn set_button(&mut self, button: XboxButton, down: bool) {
        self.buttons[button.index()].set_down(down);
    }

    pub fn is_button_down(&self, button: XboxButton) -> bool {
        self.buttons[button.index()].is_down()
    }

    pub fn was_button_just_pressed(&self, button: XboxButton) -> bool {
        self.buttons[button.index()].was_just_pressed()
    }

    pub fn was_button_just_released(&self, button: XboxButton) -> bool {
        self.buttons[button.index()].was_just_released()
    }

    pub(crate) fn end_frame(&mut self) {
        for b in &mut self.buttons {
            b.roll_over();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_dead_zone_reads_zero() {
        let mut stick = AnalogJoystick::default();
        stick.update_position(Vec2::new(0.2, 0.0));
        assert_eq!(stick.position(), Vec2::ZERO);
        assert_eq!(stick.raw_position(), Vec2::new(0.2, 0.0));
    }

    #[test]
    fn outer_dead_zone_saturates() {
        let mut stick = AnalogJoystick::default();
        stick.update_position(Vec2::new(0.0, 0.97));
        assert!((stick.position() - Vec2::Y).length() < 1e-6);
        assert!((stick.orientation_degrees() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn midrange_is_remapped() {
        let mut stick = AnalogJoystick::new(0.2, 1.0);
        stick.update_position(Vec2::new(0.6, 0.0));
        assert!((stick.magnitude() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn button_edges() {
        let mut pad = XboxController::new();
        pad.set_connected(true);
        pad.set_button(XboxButton::Start, true);
        assert!(pad.is_button_down(XboxButton::Start));
        assert!(pad.was_button_just_pressed(XboxButton::Start));
        pad.end_frame();
        assert!(!pad.was_button_just_pressed(XboxButton::Start));
        pad.set_button(XboxButton::Start, false);
        assert!(pad.was_button_just_released(XboxButton::Start));
    }

    #[test]
    fn disconnect_clears_state() {
        let mut pad = XboxController::new();
        pad.set_connected(true);
        pad.set_triggers(1.0, 0.5);
        pad.set_button(XboxButton::A, true);
        pad.set_connected(false);
        assert!(!pad.is_connected());
        assert_eq!(pad.left_trigger(), 0.0);
        assert!(!pad.is_button_down(XboxButton::A));
    }

    #[test]
    fn triggers_are_clamped() {
        let mut pad = XboxController::new();
        pad.set_triggers(2.0, -1.0);
        assert_eq!(pad.left_trigger(), 1.0);
        assert_eq!(pad.right_trigger(), 0.0);
    }
}
