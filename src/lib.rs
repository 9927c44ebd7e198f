//! Lucid Drift - a side-view arcade runner that shifts between energy states
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, physics, collisions, run state)
//! - `tuning`: Data-driven physics and energy economy
//! - `hud`: Text readouts derived from the simulation
//! - `music`: Crossfade planning for the two-track music bed
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Web Audio playback of the music bed (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod hud;
pub mod music;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AudioError, ConfigError};
pub use settings::Settings;
pub use tuning::{EnergyProfile, Tuning};

/// Game configuration constants
pub mod consts {
    /// Upper bound for one frame's dt (tab resume, long stalls)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Default world size, replaced by the canvas size at runtime
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 420.0;

    /// Player spawn point (top-left of the player rect)
    pub const SPAWN_X: f32 = 120.0;
    pub const SPAWN_Y: f32 = 120.0;
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 46.0;
}

/// Clamp a wall-clock frame delta into a safe simulation step.
///
/// Negative or NaN deltas (clock skew, first frame) become zero.
#[inline]
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt < 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(0.016, consts::MAX_FRAME_DT), 0.016);
        assert_eq!(clamp_frame_dt(2.5, consts::MAX_FRAME_DT), consts::MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(-1.0, consts::MAX_FRAME_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN, consts::MAX_FRAME_DT), 0.0);
    }
}
