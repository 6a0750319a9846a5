//! Game configuration loaded from YAML.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//! ```yaml
//! player:
//!   move_speed: 4.0
//! camera:
//!   fov_degrees: 75.0
//! ```

use std::path::Path;

use glam::{Vec2, Vec3};
use protogame_common::Aabb2;
use serde::{Deserialize, Serialize};

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn require(
    ok: bool,
    field: &str,
    value: impl std::fmt::Display,
    rule: &str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} = {value} must be {rule}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    require(value.is_finite() && value >= 0.0, field, value, "finite and >= 0")
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    require(value.is_finite() && value > 0.0, field, value, "finite and > 0")
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub aspect: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Protogame3D".to_string(),
            aspect: 2.0,
        }
    }
}

/// Virtual screen-space extent used by screen cameras and overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 800.0,
        }
    }
}

impl ScreenConfig {
    pub fn bounds(&self) -> Aabb2 {
        Aabb2::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Degrees of yaw/pitch per pixel of pointer motion.
    pub mouse_sensitivity: f32,
    pub move_speed: f32,
    pub boost_multiplier: f32,
    pub roll_rate_degrees: f32,
    pub pitch_limit_degrees: f32,
    pub roll_limit_degrees: f32,
    pub start_position: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.08,
            move_speed: 2.0,
            boost_multiplier: 10.0,
            roll_rate_degrees: 90.0,
            pitch_limit_degrees: 85.0,
            roll_limit_degrees: 45.0,
            start_position: Vec3::new(-1.0, 0.0, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub aspect: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect: 2.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Upper bound on a single frame's real delta.
    pub max_delta_seconds: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_delta_seconds: 0.1,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game core cannot run with: limits that would
    /// invert a clamp, degenerate lenses and non-finite numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("window.aspect", self.window.aspect)?;
        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;

        let p = &self.player;
        require(
            p.mouse_sensitivity.is_finite(),
            "player.mouse_sensitivity",
            p.mouse_sensitivity,
            "finite",
        )?;
        non_negative("player.move_speed", p.move_speed)?;
        non_negative("player.boost_multiplier", p.boost_multiplier)?;
        non_negative("player.roll_rate_degrees", p.roll_rate_degrees)?;
        non_negative("player.pitch_limit_degrees", p.pitch_limit_degrees)?;
        non_negative("player.roll_limit_degrees", p.roll_limit_degrees)?;
        require(
            p.start_position.is_finite(),
            "player.start_position",
            p.start_position,
            "finite",
        )?;

        let c = &self.camera;
        positive("camera.aspect", c.aspect)?;
        require(
            c.fov_degrees.is_finite() && c.fov_degrees > 0.0 && c.fov_degrees < 180.0,
            "camera.fov_degrees",
            c.fov_degrees,
            "between 0 and 180",
        )?;
        positive("camera.near", c.near)?;
        require(c.far.is_finite() && c.far > c.near, "camera.far", c.far, "finite and > camera.near")?;

        let max = self.clock.max_delta_seconds;
        require(
            max.is_finite() && max >= 0.0,
            "clock.max_delta_seconds",
            max,
            "finite and >= 0",
        )
    }

    /// Logical window size: screen height at the window's aspect ratio.
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.screen.height * self.window.aspect, self.screen.height)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_game_constants() {
        let c = GameConfig::default();
        assert_eq!(c.window.title, "Protogame3D");
        assert_eq!(c.screen.bounds(), Aabb2::from_coords(0.0, 0.0, 1600.0, 800.0));
        assert_eq!(c.player.start_position, Vec3::new(-1.0, 0.0, 0.5));
        assert_eq!(c.player.pitch_limit_degrees, 85.0);
        assert_eq!(c.player.roll_limit_degrees, 45.0);
        assert_eq!(c.camera.fov_degrees, 60.0);
        assert_eq!(c.clock.max_delta_seconds, 0.1);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let c = GameConfig::from_yaml_str("player:\n  move_speed: 4.0\n").unwrap();
        assert_eq!(c.player.move_speed, 4.0);
        assert_eq!(c.player.boost_multiplier, 10.0);
        assert_eq!(c.camera, CameraConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let c = GameConfig::from_yaml_str("{}").unwrap();
        assert_eq!(c, GameConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window:\n  title: Sandbox\ncamera:\n  fov_degrees: 75.0").unwrap();
        let c = GameConfig::load(tmp.path()).unwrap();
        assert_eq!(c.window.title, "Sandbox");
        assert_eq!(c.camera.fov_degrees, 75.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        let err = GameConfig::from_yaml_str("player: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    fn invalid(yaml: &str) -> String {
        match GameConfig::from_yaml_str(yaml) {
            Err(ConfigError::Invalid(msg)) => msg,
            other => panic!("expected invalid config for {yaml:?}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_player_limits() {
        assert!(invalid("player:\n  pitch_limit_degrees: -10.0\n").starts_with("player.pitch_limit_degrees"));
        assert!(invalid("player:\n  roll_limit_degrees: -1.0\n").starts_with("player.roll_limit_degrees"));
        assert!(invalid("player:\n  move_speed: -2.0\n").starts_with("player.move_speed"));
        assert!(invalid("player:\n  boost_multiplier: -3.0\n").starts_with("player.boost_multiplier"));
        assert!(invalid("player:\n  roll_rate_degrees: -90.0\n").starts_with("player.roll_rate_degrees"));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(invalid("player:\n  pitch_limit_degrees: .nan\n").starts_with("player.pitch_limit_degrees"));
        assert!(invalid("player:\n  mouse_sensitivity: .inf\n").starts_with("player.mouse_sensitivity"));
        assert!(invalid("player:\n  start_position: [0.0, .nan, 0.0]\n").starts_with("player.start_position"));
        assert!(invalid("clock:\n  max_delta_seconds: .nan\n").starts_with("clock.max_delta_seconds"));
    }

    #[test]
    fn rejects_negative_clock_delta() {
        assert!(invalid("clock:\n  max_delta_seconds: -0.5\n").starts_with("clock.max_delta_seconds"));
    }

    #[test]
    fn rejects_degenerate_lens() {
        assert!(invalid("camera:\n  aspect: 0.0\n").starts_with("camera.aspect"));
        assert!(invalid("camera:\n  fov_degrees: 180.0\n").starts_with("camera.fov_degrees"));
        assert!(invalid("camera:\n  fov_degrees: -5.0\n").starts_with("camera.fov_degrees"));
        assert!(invalid("camera:\n  near: 0.0\n").starts_with("camera.near"));
        assert!(invalid("camera:\n  near: 1.0\n  far: 0.5\n").starts_with("camera.far"));
    }

    #[test]
    fn rejects_degenerate_window_and_screen() {
        assert!(invalid("window:\n  aspect: -2.0\n").starts_with("window.aspect"));
        assert!(invalid("screen:\n  width: 0.0\n").starts_with("screen.width"));
        assert!(invalid("screen:\n  height: .inf\n").starts_with("screen.height"));
    }

    #[test]
    fn zero_limits_are_allowed() {
        let c = GameConfig::from_yaml_str(
            "player:\n  pitch_limit_degrees: 0.0\n  roll_limit_degrees: 0.0\nclock:\n  max_delta_seconds: 0.0\n",
        )
        .unwrap();
        assert_eq!(c.player.pitch_limit_degrees, 0.0);
        assert_eq!(c.clock.max_delta_seconds, 0.0);
    }

    #[test]
    fn invalid_file_fails_to_load() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "clock:\n  max_delta_seconds: -0.5").unwrap();
        let err = GameConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn window_size_follows_aspect() {
        let c = GameConfig::default();
        assert_eq!(c.window_size(), Vec2::new(1600.0, 800.0));
        let wide = GameConfig::from_yaml_str("window:\n  aspect: 2.5\n").unwrap();
        assert_eq!(wide.window_size(), Vec2::new(2000.0, 800.0));
    }

    #[test]
    fn yaml_round_trip() {
        let c = GameConfig::default();
        let back = GameConfig::from_yaml_str(&c.to_yaml_string().unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
