//! Frame kernel: clocks, the named-event bus, and the subsystem lifecycle.
//!
//! # Invariants
//! - A clock only scales or zeroes logical time; callers still tick every frame.
//! - Event names are case-insensitive.
//! - Subsystems start in a fixed order and shut down in the reverse order.

pub mod clock;
pub mod event;
pub mod subsystem;

pub use clock::Clock;
pub use event::{EventArgs, EventCallback, EventSystem, SubscriptionId};
pub use subsystem::EngineSubsystem;
