//! Web Audio voices for the sequencer and effects
//!
//! Music: voices -> music gain -> low-pass -> destination. The low-pass
//! cutoff is what the scheduler's `Cutoff` events steer.
//! Effects: voices -> sfx gain -> destination, unfiltered.

use rand::Rng;
use web_sys::{
    AudioBuffer, AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

use super::SoundEffect;
use super::scheduler::{ScheduledEvent, Voice};
use crate::settings::Settings;
use crate::sim::difficulty::MIN_CUTOFF_HZ;

/// Bus level before user volume
const MASTER_LEVEL: f32 = 0.3;
/// Time constant for cutoff glides (seconds)
const CUTOFF_GLIDE: f64 = 0.1;
/// Snare noise length (seconds)
const NOISE_SECS: f32 = 0.1;
/// High-pass corner for the snare noise
const SNARE_HIGHPASS_HZ: f32 = 1000.0;
/// The hi-hat is a very short, very high square blip
const HIHAT_HZ: f32 = 8000.0;

/// Nodes that live as long as the context
struct Graph {
    ctx: AudioContext,
    music: GainNode,
    sfx: GainNode,
    filter: BiquadFilterNode,
    noise: Option<AudioBuffer>,
}

/// Audio manager for the game
pub struct AudioManager {
    graph: Option<Graph>,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let graph = Self::build_graph();
        if graph.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut manager = Self {
            graph,
            music_volume: 0.0,
            sfx_volume: 0.0,
        };
        manager.apply_settings(settings);
        manager
    }

    fn build_graph() -> Option<Graph> {
        let ctx = AudioContext::new().ok()?;

        let music = ctx.create_gain().ok()?;
        let sfx = ctx.create_gain().ok()?;
        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(MIN_CUTOFF_HZ);
        filter.q().set_value(1.0);

        music.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&ctx.destination()).ok()?;
        sfx.connect_with_audio_node(&ctx.destination()).ok()?;

        let noise = Self::noise_buffer(&ctx);
        Some(Graph {
            ctx,
            music,
            sfx,
            filter,
            noise,
        })
    }

    /// One buffer of white noise, reused by every snare hit
    fn noise_buffer(ctx: &AudioContext) -> Option<AudioBuffer> {
        let rate = ctx.sample_rate();
        let len = (rate * NOISE_SECS) as u32;
        let buffer = ctx.create_buffer(1, len, rate).ok()?;
        let mut rng = rand::rng();
        let mut samples: Vec<f32> = (0..len).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;
        Some(buffer)
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(graph) = &self.graph {
            if graph.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = graph.ctx.resume();
            }
        }
    }

    /// Audio clock in seconds; 0 when audio is unavailable
    pub fn current_time(&self) -> f64 {
        self.graph.as_ref().map_or(0.0, |g| g.ctx.current_time())
    }

    pub fn is_available(&self) -> bool {
        self.graph.is_some()
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.effective_music_volume();
        self.sfx_volume = settings.effective_sfx_volume();
        if let Some(graph) = &self.graph {
            graph.music.gain().set_value(MASTER_LEVEL * self.music_volume);
            graph.sfx.gain().set_value(MASTER_LEVEL * self.sfx_volume);
        }
    }

    /// Voice one scheduler event
    pub fn play(&self, event: &ScheduledEvent) {
        let Some(graph) = &self.graph else { return };
        match *event {
            ScheduledEvent::Cutoff { time, hz } => {
                graph
                    .filter
                    .frequency()
                    .set_target_at_time(hz, time, CUTOFF_GLIDE)
                    .ok();
            }
            ScheduledEvent::Note { time, voice } => match voice {
                Voice::Kick => self.play_kick(graph, time),
                Voice::Snare => self.play_snare(graph, time),
                Voice::HiHat => self.play_blip(graph, time, HIHAT_HZ),
                Voice::Bass { hz } => self.play_bass(graph, time, hz),
                Voice::Lead { hz } => self.play_blip(graph, time, hz),
            },
        }
    }

    /// Play a one-shot effect now
    pub fn play_effect(&self, effect: SoundEffect) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        let Some(graph) = &self.graph else { return };
        let t = graph.ctx.current_time();
        match effect {
            SoundEffect::Jump => self.play_jump(graph, t),
            SoundEffect::Coin => self.play_coin(graph, t),
            SoundEffect::Crash => self.play_crash(graph, t),
        }
    }

    // === Voices ===

    /// Create an oscillator feeding `bus` through its own gain
    fn create_osc(
        &self,
        graph: &Graph,
        bus: &GainNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = graph.ctx.create_oscillator().ok()?;
        let gain = graph.ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(bus).ok()?;

        Some((osc, gain))
    }

    /// Kick - sine with a falling pitch
    fn play_kick(&self, graph: &Graph, t: f64) {
        let Some((osc, gain)) =
            self.create_osc(graph, &graph.music, 150.0, OscillatorType::Sine)
        else {
            return;
        };
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        gain.gain().set_value_at_time(1.0, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.5).ok();
    }

    /// Snare - high-passed noise burst
    fn play_snare(&self, graph: &Graph, t: f64) {
        let Some(noise) = &graph.noise else { return };
        let Some(source) = graph.ctx.create_buffer_source().ok() else {
            return;
        };
        let Some(filter) = graph.ctx.create_biquad_filter().ok() else {
            return;
        };
        let Some(gain) = graph.ctx.create_gain().ok() else {
            return;
        };

        source.set_buffer(Some(noise));
        filter.set_type(BiquadFilterType::Highpass);
        filter.frequency().set_value(SNARE_HIGHPASS_HZ);

        if source.connect_with_audio_node(&filter).is_err()
            || filter.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&graph.music).is_err()
        {
            return;
        }

        gain.gain().set_value_at_time(0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        source.start_with_when(t).ok();
    }

    /// Bass - sawtooth through a closing per-note low-pass
    fn play_bass(&self, graph: &Graph, t: f64, hz: f32) {
        let Some(osc) = graph.ctx.create_oscillator().ok() else {
            return;
        };
        let Some(filter) = graph.ctx.create_biquad_filter().ok() else {
            return;
        };
        let Some(gain) = graph.ctx.create_gain().ok() else {
            return;
        };

        osc.set_type(OscillatorType::Sawtooth);
        osc.frequency().set_value(hz);
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value_at_time(800.0, t).ok();
        filter
            .frequency()
            .linear_ramp_to_value_at_time(200.0, t + 0.2)
            .ok();

        if osc.connect_with_audio_node(&filter).is_err()
            || filter.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&graph.music).is_err()
        {
            return;
        }

        gain.gain().set_value_at_time(0.4, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.25).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Lead notes and hi-hat ticks - short square blip
    fn play_blip(&self, graph: &Graph, t: f64, hz: f32) {
        let Some((osc, gain)) =
            self.create_osc(graph, &graph.music, hz, OscillatorType::Square)
        else {
            return;
        };
        gain.gain().set_value_at_time(0.15, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Jump - quick upward chirp
    fn play_jump(&self, graph: &Graph, t: f64) {
        let Some((osc, gain)) =
            self.create_osc(graph, &graph.sfx, 300.0, OscillatorType::Triangle)
        else {
            return;
        };
        gain.gain().set_value_at_time(0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.12)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Coin - two-note ding
    fn play_coin(&self, graph: &Graph, t: f64) {
        for (i, freq) in [987.77, 1318.51].iter().enumerate() {
            let start = t + i as f64 * 0.07;
            if let Some((osc, gain)) =
                self.create_osc(graph, &graph.sfx, *freq, OscillatorType::Sine)
            {
                gain.gain().set_value_at_time(0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.25).ok();
            }
        }
    }

    /// Crash - low descending growl
    fn play_crash(&self, graph: &Graph, t: f64) {
        let Some((osc, gain)) =
            self.create_osc(graph, &graph.sfx, 200.0, OscillatorType::Sawtooth)
        else {
            return;
        };
        gain.gain().set_value_at_time(0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.8)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.8)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.9).ok();
    }
}
