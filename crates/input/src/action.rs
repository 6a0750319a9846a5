use std::collections::BTreeMap;

use crate::KeyCode;

/// A game-level intent bound to a keyboard key.
///
/// Game and player logic query actions, never raw key codes, so rebinding
/// only touches [`KeyBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Leave attract mode and start playing.
    StartGame,
    /// Return to attract mode; quits when already there.
    Cancel,
    /// Tear down and rebuild the game.
    Restart,
    ToggleConsole,
    TogglePause,
    StepFrame,
    /// Held: run the game clock at a tenth of real time.
    SlowMotion,
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    RollNegative,
    RollPositive,
    SpeedBoost,
    ResetPlayer,
    DebugLine,
    DebugPoint,
    DebugWireSphere,
    DebugBasis,
    DebugBillboardText,
    DebugWireCylinder,
    DebugMessage,
}

/// Action → key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: BTreeMap<Action, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let keys = [
            (StartGame, KeyCode::Space),
            (Cancel, KeyCode::Escape),
            (Restart, KeyCode::F8),
            (ToggleConsole, KeyCode::Tilde),
            (TogglePause, KeyCode::P),
            (StepFrame, KeyCode::O),
            (SlowMotion, KeyCode::T),
            (MoveForward, KeyCode::W),
            (MoveBackward, KeyCode::S),
            (MoveLeft, KeyCode::A),
            (MoveRight, KeyCode::D),
            (MoveUp, KeyCode::C),
            (MoveDown, KeyCode::Z),
            (RollNegative, KeyCode::Q),
            (RollPositive, KeyCode::E),
            (SpeedBoost, KeyCode::Shift),
            (ResetPlayer, KeyCode::H),
            (DebugLine, KeyCode::Digit1),
            (DebugPoint, KeyCode::Digit2),
            (DebugWireSphere, KeyCode::Digit3),
            (DebugBasis, KeyCode::Digit4),
            (DebugBillboardText, KeyCode::Digit5),
            (DebugWireCylinder, KeyCode::Digit6),
            (DebugMessage, KeyCode::Digit7),
        ]
        .into_iter()
        .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Key bound to `action`, if any.
    pub fn key(&self, action: Action) -> Option<KeyCode> {
        self.keys.get(&action).copied()
    }

    /// Bind `action` to `key`, returning the previous key.
    pub fn rebind(&mut self, action: Action, key: KeyCode) -> Option<KeyCode> {
        self.keys.insert(action, key)
    }

    pub fn unbind(&mut self, action: Action) -> Option<KeyCode> {
        self.keys.remove(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, KeyCode)> + '_ {
        self.keys.iter().map(|(a, k)| (*a, *k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_mode_keys() {
        let b = KeyBindings::default();
        assert_eq!(b.key(Action::StartGame), Some(KeyCode::Space));
        assert_eq!(b.key(Action::Cancel), Some(KeyCode::Escape));
        assert_eq!(b.key(Action::Restart), Some(KeyCode::F8));
        assert_eq!(b.key(Action::ToggleConsole), Some(KeyCode::Tilde));
    }

    #[test]
    fn rebind_and_unbind() {
        let mut b = KeyBindings::default();
        assert_eq!(b.rebind(Action::MoveForward, KeyCode::Up), Some(KeyCode::W));
        assert_eq!(b.key(Action::MoveForward), Some(KeyCode::Up));
        b.unbind(Action::MoveForward);
        assert_eq!(b.key(Action::MoveForward), None);
    }

    #[test]
    fn every_default_key_is_unique() {
        let b = KeyBindings::default();
        let mut keys: Vec<KeyCode> = b.iter().map(|(_, k)| k).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
