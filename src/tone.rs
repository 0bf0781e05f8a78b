//! Synthesized tones, the desktop stand-in for an oscillator and gain node.

use std::{f32::consts::TAU, time::Duration};

use rodio::{ChannelCount, SampleRate, Source};

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// value at `phase` in `[0, 1)` of a cycle, in `[-1, 1]`
    #[must_use]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Self::Sine => (TAU * phase).sin(),
            Self::Triangle => 4.0f32.mul_add((phase - 0.5).abs(), -1.0),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Sawtooth => 2.0f32.mul_add(phase, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// starts at 0.1 and decays exponentially to 0.01
    Decay,
    /// ramps to 0.2 over 50ms then decays exponentially to 0.01
    Swell,
}

const SWELL_ATTACK: f32 = 0.05;

impl Envelope {
    #[must_use]
    pub fn gain(self, t: f32, duration: f32) -> f32 {
        match self {
            Self::Decay => exponential_ramp(0.1, 0.01, t / duration),
            Self::Swell if t < SWELL_ATTACK => 0.2 * t / SWELL_ATTACK,
            Self::Swell => exponential_ramp(
                0.2,
                0.01,
                (t - SWELL_ATTACK) / (duration - SWELL_ATTACK).max(f32::EPSILON),
            ),
        }
    }
}

fn exponential_ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
    pub waveform: Waveform,
    pub envelope: Envelope,
}

impl Tone {
    /// a decaying sine beep
    #[must_use]
    pub const fn beep(frequency: f32, duration: Duration) -> Self {
        Self {
            frequency,
            duration,
            waveform: Waveform::Sine,
            envelope: Envelope::Decay,
        }
    }

    #[must_use]
    pub fn sample_at(&self, t: f32) -> f32 {
        let phase = (self.frequency * t).fract();
        self.waveform.sample(phase) * self.envelope.gain(t, self.duration.as_secs_f32())
    }

    #[must_use]
    pub fn source(self) -> ToneSource {
        ToneSource::new(self)
    }
}

/// A finite mono [`Source`] rendering a [`Tone`].
#[derive(Debug, Clone)]
pub struct ToneSource {
    tone: Tone,
    index: u64,
    total: u64,
}

impl ToneSource {
    #[must_use]
    pub fn new(tone: Tone) -> Self {
        let total = (tone.duration.as_secs_f64() * f64::from(SAMPLE_RATE)).round() as u64;
        Self {
            tone,
            index: 0,
            total,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let t = self.index as f32 / SAMPLE_RATE as f32;
        self.index += 1;
        Some(self.tone.sample_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.total - self.index).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl Source for ToneSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> ChannelCount {
        1
    }

    fn sample_rate(&self) -> SampleRate {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.tone.duration)
    }
}
