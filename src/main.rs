use std::{error::Error, fs, path::Path, thread, time::Duration};

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use eframe::{egui::ViewportBuilder, run_native};
use ramadan_clock::{
    alerts::Alert,
    audio::{self, AdhanVariant},
    config::Config,
    player::Player,
    session::Session,
    timetable::{Convention, LocationId},
    widget::FULL_SIZE,
    RamadanClock,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// write the default config and create the sounds folder
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// print the countdown for a moment, now by default
    Status {
        #[clap(long, short)]
        location: Option<LocationId>,
        #[clap(long, short)]
        convention: Option<Convention>,
        /// local time as "YYYY-MM-DD HH:MM:SS"
        #[clap(long, value_parser = parse_moment)]
        at: Option<NaiveDateTime>,
    },
    /// print the month's timetable
    Timetable {
        #[clap(long, short)]
        location: Option<LocationId>,
    },
    /// play an alert sound through the default output
    Play {
        sound: TestSound,
        #[clap(long, short, value_parser = clap::value_parser!(u8).range(1..=4))]
        variant: Option<u8>,
        /// how long to let a recorded adhan play
        #[clap(long, default_value_t = 30)]
        seconds: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TestSound {
    Beep,
    Triple,
    Alarm,
    Azan,
}

fn parse_moment(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("expected YYYY-MM-DD HH:MM:SS: {e}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_file_logger::init_logger!("ramadan_clock")
        .map_err(|e| format!("couldn't initialize logger: {e:?}"))?;

    let args = Args::parse();
    let config_path = Config::config_path()?;
    // init has to work even when the current file no longer parses
    if let Some(Command::Init { force }) = args.command {
        return init(&config_path, force);
    }
    let mut config = Config::load(&config_path)?;
    match args.command {
        Some(Command::Init { .. }) | None => {}
        Some(Command::Status {
            location,
            convention,
            at,
        }) => {
            if let Some(location) = location {
                config.preferences.location = location;
            }
            if let Some(convention) = convention {
                config.preferences.convention = convention;
            }
            status(config, at.unwrap_or_else(|| Local::now().naive_local()));
            return Ok(());
        }
        Some(Command::Timetable { location }) => {
            timetable(location.unwrap_or(config.preferences.location));
            return Ok(());
        }
        Some(Command::Play {
            sound,
            variant,
            seconds,
        }) => return play(&config, sound, variant, seconds),
    }

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Ramadan Clock")
            .with_inner_size(FULL_SIZE),
        ..Default::default()
    };
    let player = Player::spawn(config.assets()?);
    run_native(
        "Ramadan Clock",
        native_options,
        Box::new(|_| Ok(Box::new(RamadanClock::new(config, player)))),
    )
    .map_err(Into::into)
}

fn init(config_path: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    let Some(config) = Config::init(config_path, force)? else {
        println!(
            "config already exists at {}, use --force to overwrite",
            config_path.display()
        );
        return Ok(());
    };
    let sounds = config.sounds_path()?;
    fs::create_dir_all(&sounds)?;
    println!("wrote {}", config_path.display());
    println!(
        "put azan1.mp3, azan2.mp3 and Azan.mp3 in {} to use recorded adhans",
        sounds.display()
    );
    Ok(())
}

fn status(config: Config, now: NaiveDateTime) {
    let session = Session::new(config.preferences);
    let view = session.view(now);
    let preferences = session.preferences();
    let state = if view.status.is_active() {
        "ACTIVE"
    } else {
        "WAITING"
    };
    println!(
        "{} | {} | {state}",
        session.location().name,
        view.status.badge()
    );
    println!("{} {}", view.countdown.label, view.countdown.time);
    println!("{}", view.countdown.message);
    println!(
        "Sehri {} AM | Iftar {} PM ({})",
        view.today.sehri.get(preferences.convention),
        view.today.iftar.get(preferences.convention),
        preferences.convention
    );
    if let Some(wake_window) = view.wake_window {
        println!("{wake_window}");
    }
}

fn timetable(location: LocationId) {
    let location = location.location();
    println!("{}", location.name);
    println!("day  date            sehri(H)  iftar(H)  sehri(J)  iftar(J)");
    for record in location.days {
        println!(
            "{:>3}  {} {:<8} {:<2} {} AM  {} PM  {} AM  {} PM",
            record.day,
            record.weekday,
            record.date,
            if record.is_jummah() { "J" } else { "" },
            record.sehri.hanafi,
            record.iftar.hanafi,
            record.sehri.jafri,
            record.iftar.jafri,
        );
    }
}

fn play(
    config: &Config,
    sound: TestSound,
    variant: Option<u8>,
    seconds: u64,
) -> Result<(), Box<dyn Error>> {
    let (alert, duration) = match sound {
        TestSound::Beep => (Alert::Beeps(1), audio::length(&audio::beeps(1))),
        TestSound::Triple => (Alert::TripleBeep, audio::length(&audio::triple_beep())),
        TestSound::Alarm => (Alert::WakeAlarm, audio::length(&audio::alarm_melody())),
        TestSound::Azan => {
            let variant = match variant {
                Some(number) => AdhanVariant::try_from(number)?,
                None => config.preferences.azan_variant,
            };
            (Alert::Adhan(variant), Duration::from_secs(seconds))
        }
    };
    let player = Player::spawn(config.assets()?);
    player.play(alert);
    // let the tail of the last tone ring out before the player is dropped
    thread::sleep(duration + Duration::from_millis(200));
    Ok(())
}
