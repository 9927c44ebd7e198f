//! Music bed crossfade planning
//!
//! Two looping tracks play for the whole session, one per energy state, and a
//! shift fades one in while the other fades out. `MusicDirector` decides what
//! to do; the Web Audio backend in `audio` only executes its plans, so the
//! bookkeeping can be tested natively.

use serde::Serialize;

use crate::sim::EnergyState;

/// Load state of the music bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BedStatus {
    /// Nothing requested yet (no user gesture so far)
    Idle,
    /// Tracks are being fetched and decoded
    Loading,
    /// Both tracks are playing
    Ready,
    /// Loading failed; music stays off for the session
    Failed,
}

/// What the backend should do in response to `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    /// Fetch, decode, and start both tracks
    Load,
    /// Already playing; resume the context if the browser suspended it
    Resume,
    /// A load is in flight or has failed; nothing to do
    Skip,
}

/// A gain ramp for both tracks, starting from their current gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crossfade {
    /// Track ramping up
    pub fade_in: EnergyState,
    /// Track ramping to silence
    pub fade_out: EnergyState,
    /// Gain the incoming track ramps to
    pub target_gain: f32,
    /// Ramp length in seconds
    pub duration: f32,
}

impl Crossfade {
    /// Final gain of `track` once this ramp completes
    pub fn final_gain(&self, track: EnergyState) -> f32 {
        if track == self.fade_in {
            self.target_gain
        } else {
            0.0
        }
    }
}

/// Tracks the requested energy state and the bed's readiness
#[derive(Debug, Clone)]
pub struct MusicDirector {
    target: EnergyState,
    status: BedStatus,
    crossfade_secs: f32,
    volume: f32,
}

impl MusicDirector {
    pub fn new(crossfade_secs: f32, volume: f32) -> Self {
        Self {
            target: EnergyState::Low,
            status: BedStatus::Idle,
            crossfade_secs: crossfade_secs.max(0.0),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// The energy state the music should end up in
    pub fn target(&self) -> EnergyState {
        self.target
    }

    pub fn status(&self) -> BedStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == BedStatus::Ready
    }

    /// Gain a track starts at when the bed begins playing
    pub fn initial_gain(&self, track: EnergyState) -> f32 {
        match track {
            EnergyState::Low => self.volume,
            EnergyState::High => 0.0,
        }
    }

    /// Request playback. Safe to call on every gesture.
    pub fn start(&mut self) -> StartAction {
        match self.status {
            BedStatus::Idle => {
                self.status = BedStatus::Loading;
                StartAction::Load
            }
            BedStatus::Ready => StartAction::Resume,
            BedStatus::Loading | BedStatus::Failed => StartAction::Skip,
        }
    }

    /// The backend finished loading; returns the fade to the remembered target
    pub fn loaded(&mut self) -> Option<Crossfade> {
        if self.status != BedStatus::Loading {
            return None;
        }
        self.status = BedStatus::Ready;
        log::info!("Music bed ready ({})", self.target.as_str());
        self.crossfade_to(self.target)
    }

    /// The backend gave up; music stays silent
    pub fn load_failed(&mut self) {
        self.status = BedStatus::Failed;
    }

    /// Record `target` and, once the bed is playing, plan the fade to it
    pub fn crossfade_to(&mut self, target: EnergyState) -> Option<Crossfade> {
        self.target = target;
        if !self.is_ready() {
            return None;
        }
        Some(Crossfade {
            fade_in: target,
            fade_out: target.toggled(),
            target_gain: self.volume,
            duration: self.crossfade_secs,
        })
    }
}
