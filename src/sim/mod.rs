//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Caller-supplied dt only, no clocks
//! - No randomness
//! - Stable iteration order (layout order, then roster order)
//! - No rendering, audio, or DOM dependencies

pub mod collision;
pub mod input;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Circle, Rect, circle_rect_overlap, clamp, lands_on, rects_overlap};
pub use input::{Action, InputSampler, KeyCode};
pub use level::{Color, Layout, OrbSeed, Palette, layout, palette};
pub use state::{
    Bounds, Enemy, EnergyState, FailReason, GameEvent, GameState, Orb, Player, RunPhase,
};
pub use tick::update;
