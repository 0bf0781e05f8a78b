//! Alert sounds as data: tone schedules and adhan playback plans.
//!
//! Nothing here touches an output device, the audio worker in
//! [`crate::player`] turns these into sound.

use std::{fmt, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::tone::{Envelope, Tone, Waveform};

pub const REMOTE_AZAN_URL: &str = "https://www.islamcan.com/audio/azan/azan1.mp3";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    /// delay from the moment the schedule is submitted
    pub offset: Duration,
    pub tone: Tone,
}

pub type Schedule = Vec<ScheduledTone>;

/// `count` beeps at 1000 Hz, 300ms apart.
#[must_use]
pub fn beeps(count: u8) -> Schedule {
    (0..u32::from(count))
        .map(|i| ScheduledTone {
            offset: Duration::from_millis(300) * i,
            tone: Tone::beep(1000.0, Duration::from_millis(150)),
        })
        .collect()
}

/// three short 1200 Hz beeps, used for each of the last ten seconds
#[must_use]
pub fn triple_beep() -> Schedule {
    (0..3)
        .map(|i| ScheduledTone {
            offset: Duration::from_millis(150) * i,
            tone: Tone::beep(1200.0, Duration::from_millis(100)),
        })
        .collect()
}

const ALARM_MELODY: [(f32, u64); 6] = [
    (440.0, 200),
    (554.0, 200),
    (659.0, 200),
    (880.0, 400),
    (659.0, 200),
    (880.0, 600),
];

/// The wake up ringtone: six triangle notes, played four times.
#[must_use]
pub fn alarm_melody() -> Schedule {
    let gap = Duration::from_millis(50);
    let pause = Duration::from_millis(500);
    let mut offset = Duration::ZERO;
    let mut schedule = Vec::with_capacity(ALARM_MELODY.len() * 4);
    for _ in 0..4 {
        for (frequency, millis) in ALARM_MELODY {
            let duration = Duration::from_millis(millis);
            schedule.push(ScheduledTone {
                offset,
                tone: Tone {
                    frequency,
                    duration,
                    waveform: Waveform::Triangle,
                    envelope: Envelope::Swell,
                },
            });
            offset += duration + gap;
        }
        offset += pause;
    }
    schedule
}

/// how long a schedule takes from submission until its last tone ends
#[must_use]
pub fn length(schedule: &[ScheduledTone]) -> Duration {
    schedule
        .iter()
        .map(|scheduled| scheduled.offset + scheduled.tone.duration)
        .max()
        .unwrap_or_default()
}

/// Which call to prayer plays at iftar.
///
/// Variants one to three are local recordings, four streams a recording from
/// the web after a short beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AdhanVariant {
    #[default]
    One,
    Two,
    Three,
    Online,
}

impl AdhanVariant {
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Online];

    #[must_use]
    pub const fn file_name(self) -> Option<&'static str> {
        match self {
            Self::One => Some("azan1.mp3"),
            Self::Two => Some("azan2.mp3"),
            Self::Three => Some("Azan.mp3"),
            Self::Online => None,
        }
    }

    /// The stand-in melody used when the recording can't be played.
    #[must_use]
    pub fn synthesized(self) -> Schedule {
        let (notes, interval, duration) = match self {
            Self::One => ([440.0, 554.0, 659.0, 440.0], 2000, 1500),
            Self::Two => ([329.63, 392.0, 440.0, 329.63], 2500, 2000),
            Self::Three | Self::Online => ([523.25, 659.25, 783.99, 523.25], 1200, 1000),
        };
        (0u32..)
            .zip(notes)
            .map(|(i, frequency)| ScheduledTone {
                offset: Duration::from_millis(interval) * i,
                tone: Tone::beep(frequency, Duration::from_millis(duration)),
            })
            .collect()
    }
}

impl TryFrom<u8> for AdhanVariant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Online),
            other => Err(format!("adhan variant must be 1 to 4, got {other}")),
        }
    }
}

impl From<AdhanVariant> for u8 {
    fn from(variant: AdhanVariant) -> Self {
        match variant {
            AdhanVariant::One => 1,
            AdhanVariant::Two => 2,
            AdhanVariant::Three => 3,
            AdhanVariant::Online => 4,
        }
    }
}

impl fmt::Display for AdhanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "Beep + Online"),
            other => write!(f, "Azan {}", u8::from(*other)),
        }
    }
}

/// One way of producing the adhan, tried in order until one succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum AdhanSource {
    File(PathBuf),
    Synth(Schedule),
    /// best effort, a failed download is only logged
    Stream(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdhanPlan {
    pub lead_in: Schedule,
    /// wait after the lead in before trying `sources`
    pub delay: Duration,
    pub sources: Vec<AdhanSource>,
}

/// Where the adhan recordings live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub sounds_dir: PathBuf,
    pub remote_url: String,
}

impl Assets {
    #[must_use]
    pub fn plan(&self, variant: AdhanVariant) -> AdhanPlan {
        match variant.file_name() {
            Some(file_name) => AdhanPlan {
                lead_in: Vec::new(),
                delay: Duration::ZERO,
                sources: vec![
                    AdhanSource::File(self.sounds_dir.join(file_name)),
                    AdhanSource::Synth(variant.synthesized()),
                ],
            },
            None => AdhanPlan {
                lead_in: beeps(1),
                delay: Duration::from_millis(500),
                sources: vec![AdhanSource::Stream(self.remote_url.clone())],
            },
        }
    }
}
