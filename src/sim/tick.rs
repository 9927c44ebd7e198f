//! Per-frame simulation step
//!
//! `update` runs the whole pipeline for one frame in a fixed order: shift
//! timer, player, wraiths, orbs, contacts, score. While the run is over it
//! only listens for a restart.

use super::collision::{circle_rect_overlap, clamp, lands_on, rects_overlap};
use super::input::{Action, InputSampler};
use super::level;
use super::state::{FailReason, GameEvent, GameState};

/// Advance the game by `dt` seconds.
///
/// `dt` should already be clamped by the caller (see
/// [`crate::clamp_frame_dt`]); negative values are treated as zero. Presses
/// not consumed during the tick are dropped before returning.
pub fn update(state: &mut GameState, input: &mut InputSampler, dt: f32) {
    let dt = dt.max(0.0);
    step(state, input, dt);
    input.end_tick();
}

fn step(state: &mut GameState, input: &mut InputSampler, dt: f32) {
    if state.is_game_over() {
        if input.consume_action(Action::Restart) {
            state.reset();
        }
        return;
    }

    update_shift(state, dt);
    update_player(state, input, dt);
    update_enemies(state, dt);
    collect_orbs(state);
    check_contacts(state);

    let score_rate = state.tuning.profile(state.energy_state).score_rate;
    state.score += f64::from(score_rate * dt);
}

/// Flip the energy state once the interval has elapsed
fn update_shift(state: &mut GameState, dt: f32) {
    state.shift_timer += dt;
    if state.shift_timer >= state.tuning.shift_interval {
        state.set_energy_state(state.energy_state.toggled());
    }
}

fn update_player(state: &mut GameState, input: &mut InputSampler, dt: f32) {
    let tuning = state.tuning;
    let profile = *tuning.profile(state.energy_state);
    let axis = input.horizontal_axis();
    let move_speed = tuning.move_speed * profile.move_speed_scale;

    let player = &mut state.player;
    player.prev_y = player.pos.y;
    let was_grounded = player.grounded;
    player.grounded = false;

    // Dash overrides gravity and steering for its whole duration
    if player.is_dashing() {
        player.dash_time -= dt;
        player.vel.x = player.dash_dir * tuning.dash_speed;
        player.vel.y = 0.0;
    } else {
        player.vel.x = axis * move_speed;
        player.vel.y += profile.gravity * dt;
    }

    let mut jumped = false;
    if input.consume_action(Action::Jump) && was_grounded && !player.is_dashing() {
        player.vel.y = -tuning.jump_speed;
        jumped = true;
    }

    let mut dashed = None;
    if input.consume_action(Action::Dash) {
        if state.energy >= tuning.dash_cost && player.dash_cooldown <= 0.0 {
            player.dash_time = tuning.dash_duration;
            player.dash_cooldown = tuning.dash_cooldown;
            player.dash_dir = if axis != 0.0 { axis.signum() } else { player.facing };
            state.energy = clamp(state.energy - tuning.dash_cost, 0.0, tuning.max_energy);
            dashed = Some(player.dash_dir);
        } else {
            log::debug!(
                "Dash refused (energy {:.1}, cooldown {:.2})",
                state.energy,
                player.dash_cooldown
            );
        }
    }

    if axis != 0.0 {
        player.facing = axis.signum();
    }

    player.pos += player.vel * dt;
    player.pos.x = clamp(
        player.pos.x,
        tuning.side_margin,
        state.bounds.width - player.size.x - tuning.side_margin,
    );

    // Ground first, then the layout's platforms in order
    let ground = level::ground_rect(&state.bounds, tuning.ground_height);
    let platforms = level::layout(state.energy_state).platforms;
    for platform in std::iter::once(&ground).chain(platforms.iter()) {
        let prev_bottom = player.prev_y + player.size.y;
        if lands_on(prev_bottom, &player.rect(), player.vel.y, platform) {
            player.pos.y = platform.y - player.size.y;
            player.vel.y = 0.0;
            player.grounded = true;
        }
    }

    if player.dash_cooldown > 0.0 {
        player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    }

    // Walking drains, standing regenerates, dashing does neither
    let dashing = player.is_dashing();
    let moving = axis.abs() > tuning.move_threshold && !dashing;
    let fell_out = player.pos.y > state.bounds.height + tuning.fall_out_depth;

    if moving {
        state.energy = clamp(
            state.energy - profile.drain_rate * dt,
            0.0,
            tuning.max_energy,
        );
    } else if !dashing && !state.is_game_over() {
        state.energy = clamp(
            state.energy + profile.regen_rate * dt,
            0.0,
            tuning.max_energy,
        );
    }

    if jumped {
        state.push_event(GameEvent::Jumped);
    }
    if let Some(direction) = dashed {
        log::debug!("Dash {}", if direction > 0.0 { "right" } else { "left" });
        state.push_event(GameEvent::Dashed { direction });
    }
    if fell_out {
        state.fail(FailReason::LostInDrift);
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let speed_scale = state.tuning.profile(state.energy_state).enemy_speed_scale;
    for enemy in &mut state.enemies {
        enemy.patrol(speed_scale, dt);
    }
}

fn collect_orbs(state: &mut GameState) {
    let player_rect = state.player.rect();
    let hits: Vec<usize> = state
        .orbs
        .iter()
        .enumerate()
        .filter(|(_, orb)| !orb.collected && circle_rect_overlap(&orb.circle(), &player_rect))
        .map(|(index, _)| index)
        .collect();

    for index in hits {
        state.orbs[index].collected = true;
        state.add_energy(state.tuning.orb_energy);
        state.score += f64::from(state.tuning.orb_score);
        log::debug!("Orb {} collected", index);
        state.push_event(GameEvent::OrbCollected { index });
    }
}

/// Hazards, wraiths, then exhaustion; the first failure sticks
fn check_contacts(state: &mut GameState) {
    let player_rect = state.player.rect();

    let hazards = level::layout(state.energy_state).hazards;
    if hazards.iter().any(|hazard| rects_overlap(&player_rect, hazard)) {
        state.fail(FailReason::RiftCollision);
    }

    if state
        .enemies
        .iter()
        .any(|enemy| circle_rect_overlap(&enemy.circle(), &player_rect))
    {
        state.fail(FailReason::WraithContact);
    }

    if state.energy <= 0.0 {
        state.fail(FailReason::LucidityDrained);
    }
}
