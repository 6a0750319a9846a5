//! Game core: the entity set, the first-person player, props, the debug
//! grid and the frame lifecycle that drives them.
//!
//! # Invariants
//! - The game owns every entity it creates; restart replaces the whole game.
//! - Per frame: begin, update, render, end. Rendering never mutates the game.
//! - Player pitch stays within ±85° and roll within ±45° after each update.

pub mod app;
pub mod config;
pub mod engine;
pub mod entity;
pub mod game;
pub mod grid;
pub mod player;
pub mod prop;

pub use app::App;
pub use config::{CameraConfig, ClockConfig, ConfigError, GameConfig, PlayerConfig, ScreenConfig, WindowConfig};
pub use engine::{Engine, Subsystem, WindowState};
pub use entity::{Entity, EntityState, GameEntity, UpdateContext};
pub use game::{Game, QUIT_EVENT};
pub use grid::{GridBox, GridStats};
pub use player::Player;
pub use prop::{Prop, PropShape};
