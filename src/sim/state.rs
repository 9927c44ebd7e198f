//! Game state and core simulation types
//!
//! One `GameState` aggregate owns everything a run needs. Adapters read it
//! between ticks and drain its events; only `update` and the explicit
//! transitions below mutate it.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, Rect, clamp};
use super::level;
use crate::consts::*;
use crate::tuning::Tuning;

/// Global level mode: selects layout, palette, physics, and music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyState {
    #[default]
    Low,
    High,
}

impl EnergyState {
    /// The state a shift flips to
    pub fn toggled(self) -> Self {
        match self {
            EnergyState::Low => EnergyState::High,
            EnergyState::High => EnergyState::Low,
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            EnergyState::Low => "Low energy",
            EnergyState::High => "High energy",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyState::Low => "low",
            EnergyState::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(EnergyState::Low),
            "high" => Some(EnergyState::High),
            _ => None,
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Physics running
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// Fell well below the bottom edge
    LostInDrift,
    /// Touched a hazard rect
    RiftCollision,
    /// Touched an enemy
    WraithContact,
    /// Energy hit zero
    LucidityDrained,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FailReason::LostInDrift => "lost in the drift",
            FailReason::RiftCollision => "collided with a rift",
            FailReason::WraithContact => "caught by a wraith",
            FailReason::LucidityDrained => "lucidity drained",
        };
        f.write_str(reason)
    }
}

/// Things that happened during a tick, for audio/presentation observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Energy state changed (timer, reset, or external trigger)
    Shifted(EnergyState),
    /// Run ended
    Failed(FailReason),
    /// Run restarted
    Reset,
    /// Orb at this index of the active orb list was collected
    OrbCollected { index: usize },
    Jumped,
    Dashed { direction: f32 },
}

/// World size in pixels (the canvas' CSS size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// `pos.y` at the start of the current tick (landing detection)
    pub prev_y: f32,
    pub size: Vec2,
    pub vel: Vec2,
    /// +1 right, -1 left; survives zero-input frames
    pub facing: f32,
    /// Seconds of dash left (> 0 while dashing)
    pub dash_time: f32,
    /// Seconds until another dash is allowed
    pub dash_cooldown: f32,
    pub dash_dir: f32,
    pub grounded: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SPAWN_X, SPAWN_Y),
            prev_y: SPAWN_Y,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            facing: 1.0,
            dash_time: 0.0,
            dash_cooldown: 0.0,
            dash_dir: 1.0,
            grounded: false,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash_time > 0.0
    }
}

/// A patrolling wraith
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    /// Base horizontal velocity (before the energy-state multiplier)
    pub vel_x: f32,
    /// Patrol range `[min, max]` for `pos.x`
    pub range: (f32, f32),
}

impl Enemy {
    pub fn new(x: f32, y: f32, radius: f32, vel_x: f32, range: (f32, f32)) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius,
            vel_x,
            range,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Move horizontally and reflect off the patrol range ends
    pub fn patrol(&mut self, speed_scale: f32, dt: f32) {
        self.pos.x += self.vel_x * speed_scale * dt;
        if self.pos.x < self.range.0 {
            self.vel_x = self.vel_x.abs();
        } else if self.pos.x > self.range.1 {
            self.vel_x = -self.vel_x.abs();
        }
    }
}

/// An energy orb in the active layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

impl Orb {
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub energy_state: EnergyState,
    /// Player resource, always within `[0, tuning.max_energy]`
    pub energy: f32,
    pub score: f64,
    /// Seconds since the last shift
    pub shift_timer: f32,
    pub phase: RunPhase,
    /// Set once per run, only while `phase == GameOver`
    pub fail_reason: Option<FailReason>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Orbs of the active energy state's layout
    pub orbs: Vec<Orb>,
    pub bounds: Bounds,
    pub tuning: Tuning,
    /// Pending events, drained by adapters
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh run with the default tuning
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            energy_state: EnergyState::Low,
            energy: tuning.max_energy,
            score: 0.0,
            shift_timer: 0.0,
            phase: RunPhase::Playing,
            fail_reason: None,
            player: Player::default(),
            enemies: level::starting_enemies(),
            orbs: level::orbs_for(EnergyState::Low),
            bounds: Bounds::default(),
            tuning,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Seconds left until the next timed shift
    pub fn time_to_shift(&self) -> f32 {
        (self.tuning.shift_interval - self.shift_timer).max(0.0)
    }

    /// Full-width ground strip along the bottom of the world
    pub fn ground(&self) -> Rect {
        level::ground_rect(&self.bounds, self.tuning.ground_height)
    }

    /// Resize the world (canvas resize)
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.bounds = Bounds { width, height };
        }
    }

    /// Switch energy state: restart the shift timer and rebuild the orbs
    pub fn set_energy_state(&mut self, energy_state: EnergyState) {
        self.energy_state = energy_state;
        self.shift_timer = 0.0;
        self.orbs = level::orbs_for(energy_state);
        log::info!("Shifted to {}", energy_state.label());
        self.events.push(GameEvent::Shifted(energy_state));
    }

    /// End the run; only the first failure of a run sticks
    pub fn fail(&mut self, reason: FailReason) {
        if self.phase == RunPhase::GameOver {
            return;
        }
        self.phase = RunPhase::GameOver;
        self.fail_reason = Some(reason);
        log::info!("Run failed: {} (score {})", reason, self.score.floor());
        self.events.push(GameEvent::Failed(reason));
    }

    /// Restart the run in the low energy state.
    ///
    /// Wraiths keep patrolling from wherever they are.
    pub fn reset(&mut self) {
        self.energy = self.tuning.max_energy;
        self.score = 0.0;
        self.phase = RunPhase::Playing;
        self.fail_reason = None;
        self.player = Player::default();
        self.events.push(GameEvent::Reset);
        self.set_energy_state(EnergyState::Low);
    }

    /// Add to energy, keeping it inside `[0, max_energy]`
    pub fn add_energy(&mut self, amount: f32) {
        self.energy = clamp(self.energy + amount, 0.0, self.tuning.max_energy);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Peek at pending events without draining them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_low_and_full() {
        let state = GameState::new();
        assert_eq!(state.energy_state, EnergyState::Low);
        assert_eq!(state.energy, state.tuning.max_energy);
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.fail_reason.is_none());
        assert_eq!(state.orbs.len(), level::layout(EnergyState::Low).orbs.len());
        assert_eq!(state.enemies.len(), 2);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_fail_is_first_wins() {
        let mut state = GameState::new();
        state.fail(FailReason::RiftCollision);
        state.fail(FailReason::WraithContact);
        assert!(state.is_game_over());
        assert_eq!(state.fail_reason, Some(FailReason::RiftCollision));
        let failures = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Failed(_)))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn test_reset_restores_start_values() {
        let mut state = GameState::new();
        state.set_energy_state(EnergyState::High);
        state.energy = 3.0;
        state.score = 999.0;
        state.shift_timer = 7.0;
        state.player.pos = Vec2::new(500.0, 900.0);
        state.player.dash_cooldown = 0.3;
        state.player.grounded = true;
        state.fail(FailReason::LostInDrift);
        state.drain_events();

        state.reset();

        assert_eq!(state.energy_state, EnergyState::Low);
        assert_eq!(state.energy, state.tuning.max_energy);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.shift_timer, 0.0);
        assert!(!state.is_game_over());
        assert!(state.fail_reason.is_none());
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, SPAWN_Y));
        assert!(!state.player.grounded);
        assert_eq!(state.player.dash_cooldown, 0.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Reset, GameEvent::Shifted(EnergyState::Low)]
        );
    }

    #[test]
    fn test_set_energy_state_rebuilds_orbs() {
        let mut state = GameState::new();
        state.orbs[0].collected = true;
        state.shift_timer = 5.0;

        state.set_energy_state(EnergyState::High);
        assert_eq!(state.shift_timer, 0.0);
        assert!(state.orbs.iter().all(|o| !o.collected));
        let high = level::layout(EnergyState::High);
        assert_eq!(state.orbs[0].pos, Vec2::new(high.orbs[0].x, high.orbs[0].y));

        // Collection does not survive a round trip either
        state.orbs[1].collected = true;
        state.set_energy_state(EnergyState::Low);
        assert!(state.orbs.iter().all(|o| !o.collected));
    }

    #[test]
    fn test_add_energy_clamps() {
        let mut state = GameState::new();
        state.add_energy(50.0);
        assert_eq!(state.energy, state.tuning.max_energy);
        state.add_energy(-500.0);
        assert_eq!(state.energy, 0.0);
    }

    #[test]
    fn test_enemy_patrol_reflects() {
        let mut enemy = Enemy::new(299.0, 355.0, 14.0, 80.0, (180.0, 300.0));
        enemy.patrol(1.0, 0.033);
        assert!(enemy.pos.x > 300.0);
        assert_eq!(enemy.vel_x, -80.0);
        // Heading back in, no further flips
        enemy.patrol(1.0, 0.033);
        assert_eq!(enemy.vel_x, -80.0);
    }

    #[test]
    fn test_fail_reason_strings() {
        assert_eq!(FailReason::LostInDrift.to_string(), "lost in the drift");
        assert_eq!(FailReason::RiftCollision.to_string(), "collided with a rift");
        assert_eq!(FailReason::WraithContact.to_string(), "caught by a wraith");
        assert_eq!(FailReason::LucidityDrained.to_string(), "lucidity drained");
    }

    #[test]
    fn test_energy_state_parse_and_toggle() {
        assert_eq!(EnergyState::parse("HIGH"), Some(EnergyState::High));
        assert_eq!(EnergyState::parse("medium"), None);
        assert_eq!(EnergyState::Low.toggled(), EnergyState::High);
        assert_eq!(EnergyState::High.toggled().as_str(), "low");
    }
}
