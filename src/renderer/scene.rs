//! Frame composition
//!
//! Turns a `GameState` into one back-to-front triangle list in world pixels.
//! Nothing here talks to the GPU.

use super::shapes::{self, CIRCLE_SEGMENTS};
use super::vertex::Vertex;
use crate::sim::{GameState, Rect, layout, palette};

/// Alpha of the glow strip behind the ground
const GROUND_GLOW_ALPHA: f32 = 0x22 as f32 / 255.0;
/// Halo drawn behind orbs
const ORB_HALO_SCALE: f32 = 1.6;
const ORB_HALO_ALPHA: f32 = 0.35;
const ENEMY_RIM_WIDTH: f32 = 2.0;
const ENEMY_RIM_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0x55 as f32 / 255.0];
/// Gap between the player and the dash outline
const DASH_OUTLINE_GAP: f32 = 4.0;
const DASH_OUTLINE_WIDTH: f32 = 3.0;
const GAME_OVER_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.55];

/// Clear colour for the frame (the palette background)
pub fn clear_color(state: &GameState) -> [f32; 4] {
    palette(state.energy_state).background.to_linear(1.0)
}

/// Build every vertex for the current frame
pub fn build_frame(state: &GameState) -> Vec<Vertex> {
    let colors = palette(state.energy_state);
    let level = layout(state.energy_state);
    let world = Rect::new(0.0, 0.0, state.bounds.width, state.bounds.height);
    let ground = state.ground();

    let mut out = Vec::with_capacity(2048);

    // The background is the clear colour; ground glow goes first
    shapes::rect(&mut out, &ground, colors.glow.to_linear(GROUND_GLOW_ALPHA));

    let platform = colors.platform.to_linear(1.0);
    for rect in level.platforms {
        shapes::rect(&mut out, rect, platform);
    }
    shapes::rect(&mut out, &ground, platform);

    let hazard = colors.hazard.to_linear(1.0);
    for rect in level.hazards {
        shapes::rect(&mut out, rect, hazard);
    }

    // Glow halo under each orb
    let orb = colors.orb.to_linear(1.0);
    let halo = colors.glow.to_linear(ORB_HALO_ALPHA);
    for o in state.orbs.iter().filter(|o| !o.collected) {
        shapes::circle(&mut out, o.pos, o.radius * ORB_HALO_SCALE, halo, CIRCLE_SEGMENTS);
        shapes::circle(&mut out, o.pos, o.radius, orb, CIRCLE_SEGMENTS);
    }

    let enemy = colors.glow.to_linear(1.0);
    for e in &state.enemies {
        shapes::circle(&mut out, e.pos, e.radius, enemy, CIRCLE_SEGMENTS);
        shapes::ring(
            &mut out,
            e.pos,
            e.radius - ENEMY_RIM_WIDTH / 2.0,
            e.radius + ENEMY_RIM_WIDTH / 2.0,
            ENEMY_RIM_COLOR,
            CIRCLE_SEGMENTS,
        );
    }

    let player = state.player.rect();
    shapes::rect(&mut out, &player, orb);
    if state.player.is_dashing() {
        let gap = DASH_OUTLINE_GAP;
        let outline = Rect::new(
            player.x - gap,
            player.y - gap,
            player.w + 2.0 * gap,
            player.h + 2.0 * gap,
        );
        shapes::rect_outline(&mut out, &outline, DASH_OUTLINE_WIDTH, colors.glow.to_linear(1.0));
    }

    if state.is_game_over() {
        shapes::rect(&mut out, &world, GAME_OVER_DIM);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnergyState, FailReason};

    fn count_circle() -> usize {
        (CIRCLE_SEGMENTS * 3) as usize
    }

    fn count_ring() -> usize {
        (CIRCLE_SEGMENTS * 6) as usize
    }

    #[test]
    fn test_frame_starts_with_ground_glow() {
        let state = GameState::new();
        let frame = build_frame(&state);
        let ground = state.ground();
        assert_eq!(frame[0].position, [ground.x, ground.y]);
        assert_eq!(
            frame[0].color,
            palette(EnergyState::Low).glow.to_linear(GROUND_GLOW_ALPHA)
        );
        // Nothing repeats the clear colour
        let clear = clear_color(&state);
        assert!(frame.iter().all(|v| v.color != clear));
    }

    #[test]
    fn test_frame_vertex_budget() {
        let mut state = GameState::new();
        let base = build_frame(&state).len();
        // glow + 3 platforms + ground + 1 hazard + player
        let rects = 7 * 6;
        let orbs = 3 * 2 * count_circle();
        let enemies = 2 * (count_circle() + count_ring());
        assert_eq!(base, rects + orbs + enemies);

        // Collected orbs disappear
        state.orbs[0].collected = true;
        assert_eq!(build_frame(&state).len(), base - 2 * count_circle());
    }

    #[test]
    fn test_dash_outline_and_game_over_dim() {
        let mut state = GameState::new();
        let base = build_frame(&state).len();

        state.player.dash_time = 0.1;
        assert_eq!(build_frame(&state).len(), base + 24);

        state.player.dash_time = 0.0;
        state.fail(FailReason::LucidityDrained);
        let frame = build_frame(&state);
        assert_eq!(frame.len(), base + 6);
        assert_eq!(frame.last().map(|v| v.color), Some(GAME_OVER_DIM));
    }

    #[test]
    fn test_high_state_uses_its_palette() {
        let mut state = GameState::new();
        state.set_energy_state(EnergyState::High);
        assert_eq!(
            clear_color(&state),
            palette(EnergyState::High).background.to_linear(1.0)
        );
        // One more hazard than Low
        let low = build_frame(&GameState::new()).len();
        assert_eq!(build_frame(&state).len(), low + 6);
    }
}
