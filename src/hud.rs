//! HUD readouts
//!
//! Plain strings and numbers derived from the game state. The shell writes
//! them into the DOM; nothing here touches the browser.

use crate::sim::GameState;

/// Energy as a whole percentage of the maximum, 0-100
pub fn energy_percent(state: &GameState) -> u32 {
    let max = state.tuning.max_energy;
    if max <= 0.0 {
        return 0;
    }
    let fraction = (state.energy / max).clamp(0.0, 1.0);
    (fraction * 100.0).round() as u32
}

/// CSS width for the energy meter fill, e.g. `"64%"`
pub fn energy_fill_width(state: &GameState) -> String {
    format!("{}%", energy_percent(state))
}

/// Text beside the meter, e.g. `"64%"`
pub fn energy_text(state: &GameState) -> String {
    format!("{}%", state.energy.max(0.0).round() as u32)
}

pub fn score_text(state: &GameState) -> String {
    format!("{}", state.score.max(0.0).floor() as u64)
}

pub fn state_label(state: &GameState) -> &'static str {
    state.energy_state.label()
}

/// Countdown to the next shift, or the retry prompt once the run has failed
pub fn status_text(state: &GameState) -> String {
    match state.fail_reason {
        Some(reason) if state.is_game_over() => {
            format!("Run failed: {reason} — press R to retry.")
        }
        _ => format!("Shift in {}s", state.time_to_shift().ceil() as u32),
    }
}

/// Headline and prompt for the game-over overlay, `None` while playing
pub fn game_over_text(state: &GameState) -> Option<(&'static str, &'static str)> {
    state
        .is_game_over()
        .then_some(("Run failed", "Press R to restart"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnergyState, FailReason};

    #[test]
    fn test_energy_readouts() {
        let mut state = GameState::new();
        assert_eq!(energy_percent(&state), 100);
        assert_eq!(energy_fill_width(&state), "100%");

        state.energy = 63.6;
        assert_eq!(energy_percent(&state), 64);
        assert_eq!(energy_text(&state), "64%");

        state.energy = 0.0;
        assert_eq!(energy_fill_width(&state), "0%");
    }

    #[test]
    fn test_energy_percent_scales_with_max() {
        let mut state = GameState::new();
        state.tuning.max_energy = 200.0;
        state.energy = 50.0;
        assert_eq!(energy_percent(&state), 25);
        // Raw energy, not the percentage
        assert_eq!(energy_text(&state), "50%");
    }

    #[test]
    fn test_score_text_floors() {
        let mut state = GameState::new();
        state.score = 241.97;
        assert_eq!(score_text(&state), "241");
    }

    #[test]
    fn test_state_label() {
        let mut state = GameState::new();
        assert_eq!(state_label(&state), "Low energy");
        state.set_energy_state(EnergyState::High);
        assert_eq!(state_label(&state), "High energy");
    }

    #[test]
    fn test_status_text() {
        let mut state = GameState::new();
        assert_eq!(status_text(&state), "Shift in 12s");

        state.shift_timer = 3.2;
        assert_eq!(status_text(&state), "Shift in 9s");

        state.shift_timer = 11.99;
        assert_eq!(status_text(&state), "Shift in 1s");

        state.fail(FailReason::WraithContact);
        assert_eq!(
            status_text(&state),
            "Run failed: caught by a wraith — press R to retry."
        );
    }

    #[test]
    fn test_game_over_text_only_after_failure() {
        let mut state = GameState::new();
        assert_eq!(game_over_text(&state), None);

        state.fail(FailReason::RiftCollision);
        assert_eq!(
            game_over_text(&state),
            Some(("Run failed", "Press R to restart"))
        );

        state.reset();
        assert_eq!(game_over_text(&state), None);
    }
}
