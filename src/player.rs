//! The audio playback adapter.
//!
//! A [`Player`] owns one worker thread. The worker owns the output device and
//! a [`Timeline`] of deferred cues, so every scheduled beep or melody note is
//! dropped together with the player instead of firing after teardown.

use std::{
    io::Read,
    path::Path,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};

use crate::{
    alerts::Alert,
    audio::{alarm_melody, beeps, triple_beep, AdhanSource, Assets, Schedule},
    communication::Message,
    error::AudioError,
    speaker::Speaker,
    tone::Tone,
};

/// longest the worker sleeps between checks for finished downloads
const POLL: Duration = Duration::from_millis(50);
/// upper bound on a streamed recording
const MAX_STREAM_BYTES: u64 = 32 * 1024 * 1024;

/// Something that can make noise.
pub trait Output {
    fn play_tone(&mut self, tone: &Tone);
    /// plays a recording from disk as the current clip
    fn play_file(&mut self, path: &Path) -> Result<(), AudioError>;
    /// plays an in memory recording as the current clip
    fn play_bytes(&mut self, bytes: Vec<u8>) -> Result<(), AudioError>;
    fn stop_clip(&mut self);
    fn stop_all(&mut self);
}

/// Deferred items ordered by when they become due.
#[derive(Debug)]
pub struct Timeline<T> {
    pending: Vec<Pending<T>>,
    sequence: u64,
}

#[derive(Debug)]
struct Pending<T> {
    due: Instant,
    sequence: u64,
    item: T,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            sequence: 0,
        }
    }
}

impl<T> Timeline<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues each item at `now + offset`.
    pub fn submit(&mut self, now: Instant, items: impl IntoIterator<Item = (Duration, T)>) {
        for (offset, item) in items {
            self.sequence += 1;
            self.pending.push(Pending {
                due: now + offset,
                sequence: self.sequence,
                item,
            });
        }
    }

    /// Removes and returns everything due at `now`, earliest first.
    ///
    /// Items due at the same instant come out in submission order.
    pub fn due(&mut self, now: Instant) -> Vec<T> {
        let (mut ready, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = pending;
        ready.sort_by_key(|p| (p.due, p.sequence));
        ready.into_iter().map(|p| p.item).collect()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cue {
    Tone(Tone),
    /// part of an adhan's lead in or synthesized melody
    AdhanTone { generation: u64, tone: Tone },
    /// try `sources` in order, unless a newer adhan replaced this one
    Adhan {
        generation: u64,
        sources: Vec<AdhanSource>,
    },
}

struct Fetched {
    generation: u64,
    url: String,
    result: Result<Vec<u8>, AudioError>,
}

pub type Fetch = fn(&str) -> Result<Vec<u8>, AudioError>;

/// The worker side state machine, independent of the thread running it.
pub struct Engine<O> {
    output: Option<O>,
    connect: Box<dyn FnMut() -> Result<O, AudioError>>,
    fetch: Fetch,
    timeline: Timeline<Cue>,
    generation: u64,
    fetched: (Sender<Fetched>, Receiver<Fetched>),
}

impl<O: Output> Engine<O> {
    pub fn new(connect: impl FnMut() -> Result<O, AudioError> + 'static, fetch: Fetch) -> Self {
        Self {
            output: None,
            connect: Box::new(connect),
            fetch,
            timeline: Timeline::new(),
            generation: 0,
            fetched: mpsc::channel(),
        }
    }

    /// Opens the output on first use. Stays closed (and sound is skipped)
    /// until a later attempt succeeds.
    fn output(&mut self) -> Option<&mut O> {
        if self.output.is_none() {
            match (self.connect)() {
                Ok(output) => {
                    info!("audio output opened");
                    self.output = Some(output);
                }
                Err(e) => error!("{e}"),
            }
        }
        self.output.as_mut()
    }

    pub fn handle(&mut self, message: Message, now: Instant) {
        match message {
            Message::Unlock => {
                self.output();
            }
            Message::Tones(schedule) => {
                if self.output().is_some() {
                    self.submit_tones(now, schedule);
                }
            }
            Message::Adhan(plan) => {
                let Some(output) = self.output() else {
                    return;
                };
                output.stop_clip();
                self.generation += 1;
                debug!("starting adhan {}", self.generation);
                self.submit_adhan_tones(now, plan.lead_in);
                self.timeline.submit(
                    now,
                    [(
                        plan.delay,
                        Cue::Adhan {
                            generation: self.generation,
                            sources: plan.sources,
                        },
                    )],
                );
            }
            Message::Stop | Message::Shutdown => self.stop(),
        }
    }

    fn submit_tones(&mut self, now: Instant, schedule: Schedule) {
        self.timeline.submit(
            now,
            schedule.into_iter().map(|s| (s.offset, Cue::Tone(s.tone))),
        );
    }

    fn submit_adhan_tones(&mut self, now: Instant, schedule: Schedule) {
        let generation = self.generation;
        self.timeline.submit(
            now,
            schedule
                .into_iter()
                .map(|s| (s.offset, Cue::AdhanTone { generation, tone: s.tone })),
        );
    }

    /// Plays whatever became due and picks up finished downloads.
    pub fn poll(&mut self, now: Instant) {
        for cue in self.timeline.due(now) {
            match cue {
                Cue::Tone(tone) => {
                    if let Some(output) = self.output.as_mut() {
                        output.play_tone(&tone);
                    }
                }
                Cue::AdhanTone { generation, tone } if generation == self.generation => {
                    if let Some(output) = self.output.as_mut() {
                        output.play_tone(&tone);
                    }
                }
                Cue::AdhanTone { .. } => {}
                Cue::Adhan {
                    generation,
                    sources,
                } if generation == self.generation => self.play_adhan(sources, now),
                Cue::Adhan { generation, .. } => debug!("skipping replaced adhan {generation}"),
            }
        }
        while let Ok(fetched) = self.fetched.1.try_recv() {
            self.finish_stream(fetched);
        }
    }

    fn play_adhan(&mut self, sources: Vec<AdhanSource>, now: Instant) {
        let Some(output) = self.output.as_mut() else {
            return;
        };
        for source in sources {
            match source {
                AdhanSource::File(path) => match output.play_file(&path) {
                    Ok(()) => {
                        info!("playing adhan from {}", path.display());
                        return;
                    }
                    Err(e) => warn!("{e}, falling back"),
                },
                AdhanSource::Synth(schedule) => {
                    info!("playing synthesized adhan");
                    self.submit_adhan_tones(now, schedule);
                    return;
                }
                AdhanSource::Stream(url) => {
                    info!("fetching adhan from {url}");
                    let sender = self.fetched.0.clone();
                    let fetch = self.fetch;
                    let generation = self.generation;
                    thread::spawn(move || {
                        let result = fetch(&url);
                        if sender
                            .send(Fetched {
                                generation,
                                url,
                                result,
                            })
                            .is_err()
                        {
                            debug!("audio worker gone before download finished");
                        }
                    });
                    return;
                }
            }
        }
        warn!("no adhan source could be played");
    }

    fn finish_stream(&mut self, fetched: Fetched) {
        if fetched.generation != self.generation {
            debug!("dropping stale download of {}", fetched.url);
            return;
        }
        let Some(output) = self.output.as_mut() else {
            return;
        };
        match fetched.result.and_then(|bytes| output.play_bytes(bytes)) {
            Ok(()) => info!("playing adhan from {}", fetched.url),
            Err(e) => error!("{e}"),
        }
    }

    /// Silences the output and forgets every pending cue and download.
    pub fn stop(&mut self) {
        self.timeline.clear();
        self.generation += 1;
        if let Some(output) = self.output.as_mut() {
            output.stop_all();
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timeline.next_deadline()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timeline.len()
    }
}

fn run<O: Output>(mut engine: Engine<O>, receiver: &Receiver<Message>) {
    loop {
        let wait = engine.next_deadline().map_or(POLL, |deadline| {
            deadline.saturating_duration_since(Instant::now()).min(POLL)
        });
        match receiver.recv_timeout(wait) {
            Ok(Message::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(message) => engine.handle(message, Instant::now()),
            Err(RecvTimeoutError::Timeout) => {}
        }
        engine.poll(Instant::now());
    }
    engine.stop();
    info!("audio worker stopped");
}

/// Downloads a recording over http.
pub fn http_fetch(url: &str) -> Result<Vec<u8>, AudioError> {
    let stream_error = |reason: String| AudioError::RemoteStream {
        url: url.to_string(),
        reason,
    };
    let response = ureq::get(url)
        .call()
        .map_err(|e| stream_error(e.to_string()))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_STREAM_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| stream_error(e.to_string()))?;
    Ok(bytes)
}

/// Handle to the audio worker. Dropping it stops all sound.
#[derive(Debug)]
pub struct Player {
    sender: Sender<Message>,
    worker: Option<JoinHandle<()>>,
    assets: Assets,
}

impl Player {
    #[must_use]
    pub fn spawn(assets: Assets) -> Self {
        let (sender, receiver) = mpsc::channel();
        // the output stream isn't Send on every platform so it's opened on the worker
        let worker = thread::spawn(move || run(Engine::new(Speaker::open, http_fetch), &receiver));
        Self {
            sender,
            worker: Some(worker),
            assets,
        }
    }

    fn send(&self, message: Message) {
        if self.sender.send(message).is_err() {
            error!("audio worker is not running");
        }
    }

    /// opens the output device ahead of the first alert
    pub fn unlock(&self) {
        self.send(Message::Unlock);
    }

    pub fn play(&self, alert: Alert) {
        info!("playing {alert:?}");
        let message = match alert {
            Alert::Beeps(count) => Message::Tones(beeps(count)),
            Alert::TripleBeep => Message::Tones(triple_beep()),
            Alert::WakeAlarm => Message::Tones(alarm_melody()),
            Alert::Adhan(variant) => Message::Adhan(self.assets.plan(variant)),
        };
        self.send(message);
    }

    pub fn stop(&self) {
        self.send(Message::Stop);
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // the worker may already be gone, nothing to do then
        self.sender.send(Message::Shutdown).ok();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("audio worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        path::PathBuf,
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::audio::{AdhanPlan, AdhanVariant, REMOTE_AZAN_URL};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Tone(f32),
        File(PathBuf),
        Bytes(usize),
        StopClip,
        StopAll,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Event>>>,
        files_exist: bool,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Output for Recorder {
        fn play_tone(&mut self, tone: &Tone) {
            self.push(Event::Tone(tone.frequency));
        }

        fn play_file(&mut self, path: &Path) -> Result<(), AudioError> {
            if self.files_exist {
                self.push(Event::File(path.to_path_buf()));
                Ok(())
            } else {
                Err(AudioError::AssetLoad {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "missing"),
                })
            }
        }

        fn play_bytes(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
            self.push(Event::Bytes(bytes.len()));
            Ok(())
        }

        fn stop_clip(&mut self) {
            self.push(Event::StopClip);
        }

        fn stop_all(&mut self) {
            self.push(Event::StopAll);
        }
    }

    fn no_network(url: &str) -> Result<Vec<u8>, AudioError> {
        Err(AudioError::RemoteStream {
            url: url.to_string(),
            reason: "offline".to_string(),
        })
    }

    fn fake_download(_: &str) -> Result<Vec<u8>, AudioError> {
        Ok(vec![0; 16])
    }

    fn engine(recorder: &Recorder, fetch: Fetch) -> Engine<Recorder> {
        let recorder = recorder.clone();
        Engine::new(move || Ok(recorder.clone()), fetch)
    }

    fn assets() -> Assets {
        Assets {
            sounds_dir: PathBuf::from("/sounds"),
            remote_url: REMOTE_AZAN_URL.to_string(),
        }
    }

    #[test]
    fn timeline_orders_by_deadline_then_submission() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.submit(
            start,
            [
                (Duration::from_millis(20), "c"),
                (Duration::ZERO, "a"),
                (Duration::ZERO, "b"),
            ],
        );
        assert_eq!(timeline.next_deadline(), Some(start));
        assert_eq!(timeline.due(start), vec!["a", "b"]);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.due(start + Duration::from_millis(19)).is_empty());
        assert_eq!(timeline.due(start + Duration::from_millis(20)), vec!["c"]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn tones_play_when_due() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Tones(beeps(3)), start);
        engine.poll(start);
        assert_eq!(recorder.events(), vec![Event::Tone(1000.0)]);
        engine.poll(start + Duration::from_millis(600));
        assert_eq!(recorder.events().len(), 3);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn stop_cancels_pending_tones() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Tones(alarm_melody()), start);
        engine.poll(start);
        engine.handle(Message::Stop, start);
        engine.poll(start + Duration::from_secs(60));
        assert_eq!(recorder.events(), vec![Event::Tone(440.0), Event::StopAll]);
    }

    #[test]
    fn missing_recording_falls_back_to_synth() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Adhan(assets().plan(AdhanVariant::One)), start);
        engine.poll(start);
        engine.poll(start + Duration::from_secs(10));
        assert_eq!(
            recorder.events(),
            vec![
                Event::StopClip,
                Event::Tone(440.0),
                Event::Tone(554.0),
                Event::Tone(659.0),
                Event::Tone(440.0),
            ]
        );
    }

    #[test]
    fn present_recording_plays() {
        let recorder = Recorder {
            files_exist: true,
            ..Recorder::default()
        };
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Adhan(assets().plan(AdhanVariant::Two)), start);
        engine.poll(start);
        assert_eq!(
            recorder.events(),
            vec![Event::StopClip, Event::File(PathBuf::from("/sounds/azan2.mp3"))]
        );
    }

    #[test]
    fn new_adhan_replaces_pending_one() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        let delayed = AdhanPlan {
            lead_in: Vec::new(),
            delay: Duration::from_secs(1),
            sources: vec![AdhanSource::Synth(beeps(1))],
        };
        engine.handle(Message::Adhan(delayed), start);
        engine.handle(
            Message::Adhan(AdhanPlan {
                lead_in: Vec::new(),
                delay: Duration::from_secs(1),
                sources: vec![AdhanSource::Synth(triple_beep())],
            }),
            start,
        );
        engine.poll(start + Duration::from_secs(2));
        engine.poll(start + Duration::from_secs(3));
        let tones: Vec<_> = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::Tone(_)))
            .collect();
        assert_eq!(tones, vec![Event::Tone(1200.0); 3]);
    }

    #[test]
    fn new_adhan_silences_a_synthesized_one_in_progress() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Adhan(assets().plan(AdhanVariant::One)), start);
        // picks the synth fallback, then plays its first note
        engine.poll(start);
        engine.poll(start);
        assert_eq!(engine.pending(), 3);
        let later = start + Duration::from_secs(1);
        engine.handle(
            Message::Adhan(AdhanPlan {
                lead_in: Vec::new(),
                delay: Duration::ZERO,
                sources: vec![AdhanSource::Synth(triple_beep())],
            }),
            later,
        );
        engine.poll(later);
        engine.poll(start + Duration::from_secs(10));
        assert_eq!(
            recorder.events(),
            vec![
                Event::StopClip,
                Event::Tone(440.0),
                Event::StopClip,
                Event::Tone(1200.0),
                Event::Tone(1200.0),
                Event::Tone(1200.0),
            ]
        );
    }

    #[test]
    fn plain_tones_survive_a_new_adhan() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Tones(beeps(2)), start);
        engine.handle(
            Message::Adhan(AdhanPlan {
                lead_in: Vec::new(),
                delay: Duration::from_secs(5),
                sources: Vec::new(),
            }),
            start,
        );
        engine.poll(start + Duration::from_secs(1));
        assert_eq!(
            recorder.events(),
            vec![Event::StopClip, Event::Tone(1000.0), Event::Tone(1000.0)]
        );
    }

    fn poll_until(
        engine: &mut Engine<Recorder>,
        recorder: &Recorder,
        done: impl Fn(&[Event]) -> bool,
    ) {
        let give_up = Instant::now() + Duration::from_secs(5);
        while !done(&recorder.events()) && Instant::now() < give_up {
            thread::sleep(Duration::from_millis(5));
            engine.poll(Instant::now());
        }
    }

    #[test]
    fn online_adhan_beeps_then_streams() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, fake_download);
        let start = Instant::now();
        engine.handle(Message::Adhan(assets().plan(AdhanVariant::Online)), start);
        engine.poll(start);
        assert_eq!(recorder.events(), vec![Event::StopClip, Event::Tone(1000.0)]);
        engine.poll(start + Duration::from_millis(500));
        poll_until(&mut engine, &recorder, |events| events.len() == 3);
        assert_eq!(recorder.events()[2], Event::Bytes(16));
    }

    #[test]
    fn failed_stream_stays_silent() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder, no_network);
        let start = Instant::now();
        engine.handle(Message::Adhan(assets().plan(AdhanVariant::Online)), start);
        engine.poll(start + Duration::from_millis(500));
        thread::sleep(Duration::from_millis(50));
        engine.poll(Instant::now());
        assert_eq!(recorder.events(), vec![Event::StopClip, Event::Tone(1000.0)]);
    }

    #[test]
    fn unavailable_output_skips_sound_until_it_opens() {
        let recorder = Recorder::default();
        let mut attempts = 0;
        let inner = recorder.clone();
        let mut engine = Engine::new(
            move || {
                attempts += 1;
                if attempts == 1 {
                    Err(AudioError::ContextUnavailable("no device".to_string()))
                } else {
                    Ok(inner.clone())
                }
            },
            no_network,
        );
        let start = Instant::now();
        engine.handle(Message::Tones(beeps(1)), start);
        engine.poll(start);
        assert!(recorder.events().is_empty());
        engine.handle(Message::Unlock, start);
        engine.handle(Message::Tones(beeps(1)), start);
        engine.poll(start);
        assert_eq!(recorder.events(), vec![Event::Tone(1000.0)]);
    }
}
