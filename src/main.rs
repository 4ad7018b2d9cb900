//! skrid: enter a melody on the computer keyboard, see it on a stave, hear it
//! back, and export it as a melodic-search query.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use skrid::audio::{AudioEngine, DeviceFormat, SilentOutput};
use skrid::config::AppConfig;
use skrid::keymap::KeyboardLayout;
use skrid::log::EventLog;
use skrid::notation::{parse_notes, NullSurface, Stave};
use skrid::playback::{AudioOutput, Player, SystemClock};
use skrid::query::notes_query_param;
use skrid::samples::SampleBank;
use skrid::tui::App;

/// Sample rate used when no device can be probed.
const FALLBACK_SAMPLE_RATE: u32 = 44_100;
const POLL: Duration = Duration::from_millis(5);

#[derive(Parser)]
#[command(name = "skrid", version, about)]
struct Cli {
    /// Config file (default: ~/.skrid/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keyboard layout of the virtual piano
    #[arg(long, global = true, value_enum)]
    keyboard: Option<KeyboardLayout>,

    /// Directory of <key>.wav samples such as Db4.wav
    #[arg(long, global = true)]
    samples: Option<PathBuf>,

    /// Volume of new notes, 0 to 1
    #[arg(long, global = true)]
    volume: Option<f32>,

    /// Length of a whole note in seconds
    #[arg(long, global = true)]
    whole_note: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play notes such as "C4:q E4:q G4:h" and exit when they have rung out
    Play { notes: String },
    /// Print the search query parameter for the given notes
    Query {
        notes: String,
        #[arg(long)]
        ignore_pitch: bool,
        #[arg(long)]
        ignore_rhythm: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load().unwrap_or_default(),
    };
    if let Some(layout) = cli.keyboard {
        config.keyboard.layout = layout;
    }
    if let Some(dir) = cli.samples.clone() {
        config.samples.directory = Some(dir);
    }
    if let Some(volume) = cli.volume {
        config.playback.volume = volume;
    }
    if let Some(seconds) = cli.whole_note {
        config.playback.whole_note_seconds = seconds;
    }
    if let Err(e) = config.playback.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Some(Command::Query {
            notes,
            ignore_pitch,
            ignore_rhythm,
        }) => match parse_notes(&notes) {
            Ok(notes) => {
                println!("{}", notes_query_param(&notes, ignore_pitch, ignore_rhythm));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Some(Command::Play { notes }) => play(&config, &notes),
        None => tui(&config),
    }
}

/// Open the audio device, falling back to a silent output.
fn with_output<R>(config: &AppConfig, run: impl FnOnce(&mut dyn OutputRunner, EventLog) -> R) -> R {
    let mut log = EventLog::default();
    let format = DeviceFormat::probe();
    let sample_rate = format
        .as_ref()
        .map(|f| f.sample_rate)
        .unwrap_or(FALLBACK_SAMPLE_RATE);
    let bank = load_bank(config, sample_rate, &mut log);

    let engine = format.and_then(|format| AudioEngine::new(bank, format));
    match engine {
        Ok(engine) => {
            let format = engine.format();
            let label = format!(
                "{} samples @ {} Hz, {} ch",
                engine.bank().len(),
                format.sample_rate,
                format.channels
            );
            log.info(format!("audio: {label}"));
            run(
                &mut Runner {
                    output: Some(engine),
                    label,
                },
                log,
            )
        }
        Err(e) => {
            log.warn(format!("no sound: {e}"));
            run(
                &mut Runner {
                    output: Some(SilentOutput::new()),
                    label: "silent".to_string(),
                },
                log,
            )
        }
    }
}

fn load_bank(config: &AppConfig, sample_rate: u32, log: &mut EventLog) -> SampleBank {
    let samples = &config.samples;
    if let Some(dir) = &samples.directory {
        match SampleBank::load_dir(dir, sample_rate, log) {
            Ok(bank) if !bank.is_empty() => return bank,
            Ok(_) => log.warn(format!("no samples in {}", dir.display())),
            Err(e) => log.error(format!("cannot load {}: {e}", dir.display())),
        }
    }
    let bank = SampleBank::synthesized(
        samples.low_octave..=samples.high_octave,
        sample_rate,
        samples.seed,
    );
    log.info(format!("synthesized {} piano tones", bank.len()));
    bank
}

/// What a command does once an output exists.
trait OutputRunner {
    fn play(&mut self, config: &AppConfig, notes: &str, log: EventLog) -> ExitCode;
    fn tui(&mut self, config: &AppConfig, log: EventLog) -> ExitCode;
}

struct Runner<A: AudioOutput> {
    output: Option<A>,
    label: String,
}

impl<A: AudioOutput> Runner<A> {
    fn player(&mut self, config: &AppConfig, log: EventLog) -> Option<Player<A, SystemClock>> {
        let output = self.output.take()?;
        let mut player = Player::new(output, SystemClock::new(), config.playback);
        for entry in log.entries() {
            player.log_mut().push(entry.level, entry.message.clone());
        }
        Some(player)
    }
}

impl<A: AudioOutput> OutputRunner for Runner<A> {
    fn play(&mut self, config: &AppConfig, notes: &str, log: EventLog) -> ExitCode {
        let notes = match parse_notes(notes) {
            Ok(notes) => notes,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        };
        let Some(mut player) = self.player(config, log) else {
            return ExitCode::FAILURE;
        };

        let mut stave = Stave::new(NullSurface, config.layout);
        for note in notes {
            stave.push_note(note);
        }

        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            player.log_mut().warn(format!("Ctrl-C handler not installed: {e}"));
        }

        player.toggle(stave.melody());
        player.run_until_silent(POLL, || interrupted.load(Ordering::SeqCst));

        for entry in player.log_mut().drain() {
            eprintln!("{entry}");
        }
        ExitCode::SUCCESS
    }

    fn tui(&mut self, config: &AppConfig, log: EventLog) -> ExitCode {
        let Some(player) = self.player(config, log) else {
            return ExitCode::FAILURE;
        };
        let mut app = App::new(
            player,
            config.keyboard.key_map(),
            config.layout,
            self.label.clone(),
        );

        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

fn play(config: &AppConfig, notes: &str) -> ExitCode {
    with_output(config, |runner, log| runner.play(config, notes, log))
}

fn tui(config: &AppConfig) -> ExitCode {
    with_output(config, |runner, log| runner.tui(config, log))
}
