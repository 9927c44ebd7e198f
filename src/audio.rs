//! Music bed on the Web Audio API
//!
//! Both tracks loop from the moment the bed starts; only their gains move.
//! `MusicDirector` decides the fades, this module just schedules them.

use js_sys::ArrayBuffer;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, GainNode, Response,
};

use crate::error::AudioError;
use crate::music::{Crossfade, MusicDirector};
use crate::settings::Settings;
use crate::sim::EnergyState;

/// Delay before both sources start, so they begin on the same audio frame
const START_DELAY: f64 = 0.05;

/// Best-effort text for a JS exception
fn js_detail(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// One looping track and the gain node in front of it
struct Track {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

impl Track {
    fn connect(
        ctx: &AudioContext,
        buffer: &AudioBuffer,
        initial_gain: f32,
    ) -> Result<Self, AudioError> {
        let graph = |err: JsValue| AudioError::Graph(js_detail(&err));

        let source = ctx.create_buffer_source().map_err(graph)?;
        source.set_buffer(Some(buffer));
        source.set_loop(true);

        let gain = ctx.create_gain().map_err(graph)?;
        gain.gain().set_value(initial_gain);

        source.connect_with_audio_node(&gain).map_err(graph)?;
        gain.connect_with_audio_node(&ctx.destination()).map_err(graph)?;

        Ok(Self { source, gain })
    }

    fn start(&self, when: f64) -> Result<(), AudioError> {
        self.source
            .start_with_when(when)
            .map_err(|err| AudioError::Graph(js_detail(&err)))
    }

    /// Ramp linearly from the current gain to `target` over `duration`
    fn ramp(&self, now: f64, target: f32, duration: f32) {
        let param = self.gain.gain();
        let current = param.value();
        param.cancel_scheduled_values(now).ok();
        param.set_value_at_time(current, now).ok();
        param
            .linear_ramp_to_value_at_time(target, now + f64::from(duration))
            .ok();
    }
}

/// The two-track music bed
pub struct MusicBed {
    ctx: AudioContext,
    low: Track,
    high: Track,
}

impl MusicBed {
    /// Create the context, load both tracks, and start them looping.
    ///
    /// Must be called from a user gesture or the browser keeps the context
    /// suspended.
    pub async fn load(settings: &Settings, director: &MusicDirector) -> Result<Self, AudioError> {
        let ctx = AudioContext::new().map_err(|err| AudioError::Context(js_detail(&err)))?;

        let low_buffer = fetch_track(&ctx, settings.track_url(EnergyState::Low)).await?;
        let high_buffer = fetch_track(&ctx, settings.track_url(EnergyState::High)).await?;

        let low = Track::connect(&ctx, &low_buffer, director.initial_gain(EnergyState::Low))?;
        let high = Track::connect(&ctx, &high_buffer, director.initial_gain(EnergyState::High))?;

        let start = ctx.current_time() + START_DELAY;
        low.start(start)?;
        high.start(start)?;

        log::info!(
            "Music bed loaded ({:.1}s / {:.1}s)",
            low_buffer.duration(),
            high_buffer.duration()
        );
        Ok(Self { ctx, low, high })
    }

    fn track(&self, energy_state: EnergyState) -> &Track {
        match energy_state {
            EnergyState::Low => &self.low,
            EnergyState::High => &self.high,
        }
    }

    /// Resume a context the browser suspended
    pub fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            if let Err(err) = self.ctx.resume() {
                log::warn!("Failed to resume audio: {}", js_detail(&err));
            }
        }
    }

    /// Schedule a crossfade on the audio clock
    pub fn apply(&self, plan: &Crossfade) {
        let now = self.ctx.current_time();
        self.track(plan.fade_in)
            .ramp(now, plan.final_gain(plan.fade_in), plan.duration);
        self.track(plan.fade_out)
            .ramp(now, plan.final_gain(plan.fade_out), plan.duration);
    }
}

/// Fetch and decode one track
async fn fetch_track(ctx: &AudioContext, url: &str) -> Result<AudioBuffer, AudioError> {
    let fetch_err = |status: Option<u16>| AudioError::Fetch {
        url: url.to_string(),
        status,
    };
    let decode_err = |err: JsValue| AudioError::Decode {
        url: url.to_string(),
        detail: js_detail(&err),
    };

    let window = web_sys::window().ok_or_else(|| fetch_err(None))?;
    // Track names contain spaces
    let encoded = String::from(js_sys::encode_uri(url));

    let response = JsFuture::from(window.fetch_with_str(&encoded))
        .await
        .map_err(|_| fetch_err(None))?;
    let response: Response = response.dyn_into().map_err(|_| fetch_err(None))?;
    if !response.ok() {
        return Err(fetch_err(Some(response.status())));
    }

    let bytes = response.array_buffer().map_err(|_| fetch_err(None))?;
    let bytes: ArrayBuffer = JsFuture::from(bytes)
        .await
        .map_err(|_| fetch_err(None))?
        .dyn_into()
        .map_err(|_| fetch_err(None))?;

    let decoded = ctx.decode_audio_data(&bytes).map_err(decode_err)?;
    JsFuture::from(decoded)
        .await
        .map_err(decode_err)?
        .dyn_into()
        .map_err(decode_err)
}
