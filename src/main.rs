use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fmcw_sim::config::Scenario;
use fmcw_sim::dsp::processor::Processor;
use fmcw_sim::dsp::window::WindowKind;
use fmcw_sim::report::{LogReporter, Reporter};
use fmcw_sim::util::raw_data_io::{append_beat_frame, playback_session, BeatFrame};
use fmcw_sim::waveform::noise::add_receiver_noise;
use fmcw_sim::{ChirpConfig, WaveformGenerator};

#[derive(Parser)]
#[command(name = "fmcw-sim")]
#[command(about = "FMCW radar chirp and range-detection simulator")]
struct Args {
    /// JSON scenario file; the built-in three-drone scene when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Number of chirps to simulate
    #[arg(long, default_value_t = 1u64)]
    frames: u64,
    /// Append every simulated beat signal to a session file
    #[arg(long)]
    record: bool,
    #[arg(long, default_value = "recordings")]
    recordings_dir: PathBuf,
    /// Replay a recorded session instead of simulating
    #[arg(long, conflicts_with = "record")]
    playback: Option<PathBuf>,
    #[arg(long, value_enum)]
    window: Option<WindowKind>,
    #[arg(long)]
    snr_db: Option<f64>,
    #[arg(long)]
    max_peaks: Option<usize>,
    /// Seed for receiver noise
    #[arg(long, default_value_t = 0u64)]
    seed: u64,
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(window) = args.window {
        scenario.detection.window = window;
    }
    if let Some(snr_db) = args.snr_db {
        scenario.detection.snr_db = snr_db;
    }
    if let Some(max_peaks) = args.max_peaks {
        scenario.detection.max_peaks = max_peaks;
    }
    scenario.detection.validate()?;
    Ok(scenario)
}

fn playback(path: &Path, scenario: &Scenario, reporter: &dyn Reporter) -> Result<()> {
    let frames = playback_session(path)?;
    let targets = scenario.targets();
    let mut current: Option<Processor> = None;
    for frame in frames {
        let reuse = matches!(&current, Some(p) if p.config().settings() == frame.chirp);
        if !reuse {
            let config = ChirpConfig::new(frame.chirp)?;
            reporter.chirp_parameters(&config);
            current = Some(Processor::new(WaveformGenerator::new(config), scenario.detection));
        }
        let Some(processor) = current.as_ref() else { continue };
        match processor.process_beat(&frame.samples) {
            Ok(scan) => reporter.scan(frame.frame_id, &scan, &targets),
            Err(e) => error!("Processing error in frame {}: {}", frame.frame_id, e),
        }
    }
    Ok(())
}

fn simulate(args: &Args, scenario: &Scenario, reporter: &dyn Reporter) -> Result<()> {
    let config = ChirpConfig::new(scenario.chirp)?;
    reporter.chirp_parameters(&config);
    let processor = Processor::new(WaveformGenerator::new(config), scenario.detection);
    let targets = scenario.targets();
    for target in &targets {
        info!("Simulating {}: range {} m, RCS {} m^2", target.label(), target.range_m, target.rcs);
    }

    let session = if args.record {
        fs::create_dir_all(&args.recordings_dir)?;
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let filename = args.recordings_dir.join(format!("beat_session_{}.bin", timestamp));
        info!("Recording mode: appending {} frames to {:?}", args.frames, filename);
        Some(filename)
    } else {
        None
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    for frame_id in 0..args.frames {
        let mut beat = processor.simulate_beat(&targets)?;
        add_receiver_noise(&mut beat, scenario.noise_std, &mut rng)?;

        if let Some(filename) = &session {
            let frame = BeatFrame::new(frame_id, scenario.chirp, beat.clone());
            if let Err(e) = append_beat_frame(&frame, filename) {
                error!("Append error for frame {}: {}", frame_id, e);
            }
        }

        let scan = processor.process_beat(&beat)?;
        reporter.scan(frame_id, &scan, &targets);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init(); // RUST_LOG=info fmcw-sim ...
    let args = Args::parse();
    if args.frames == 0 && args.playback.is_none() {
        bail!("--frames must be at least 1");
    }
    let scenario = load_scenario(&args)?;
    let reporter = LogReporter;

    match &args.playback {
        Some(path) => playback(path, &scenario, &reporter),
        None => simulate(&args, &scenario, &reporter),
    }
}
