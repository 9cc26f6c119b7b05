use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use spike_sync::core::metrics::SynchronyEstimator;
use spike_sync::core::spikes::MultiChannelSpikeTrain;
use spike_sync::error::SyncError;
use spike_sync::signal::decimate::Decimator;
use spike_sync::signal::filter::FilterDesign;

#[derive(Parser, Debug)]
#[command(about = "Synchrony and signal conditioning of simulated neural populations")]
struct Args {
    /// The logging level, must be one of: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    /// The log file (the console if none)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the synchrony of a population from its spike trains
    Synchrony {
        /// The JSON file with the spike trains (in ms)
        #[arg(short, long)]
        input: PathBuf,
        /// The bin width (in ms)
        #[arg(long, default_value = "0.1")]
        dt: f64,
        /// The simulation end time (in ms)
        #[arg(long)]
        tstop: f64,
        /// The number of bins, defaults to tstop / dt
        #[arg(long)]
        num_bins: Option<usize>,
        /// The JSON file to write the synchrony to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decimate a multi-channel signal
    Decimate {
        /// The JSON file with the signal channels
        #[arg(short, long)]
        input: PathBuf,
        /// The JSON file to write the decimated channels to
        #[arg(short, long)]
        output: PathBuf,
        /// The down-sampling factor
        #[arg(short = 'q', long, default_value = "10")]
        factor: usize,
        /// The order of the anti-aliasing filter
        #[arg(short = 'n', long, default_value = "4")]
        order: usize,
        /// The critical frequency of the filter, relative to the decimated Nyquist frequency
        #[arg(short = 'k', long, default_value = "0.8")]
        critical_factor: f64,
        /// The anti-aliasing filter design
        #[arg(long, value_enum, default_value = "cheby1")]
        design: Design,
        /// The passband ripple of the Chebyshev filter (in dB)
        #[arg(long, default_value = "0.05")]
        ripple_db: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Design {
    Butter,
    Cheby1,
}

fn main() -> Result<(), SyncError> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("{:?}", args);

    match args.command {
        Command::Synchrony {
            input,
            dt,
            tstop,
            num_bins,
            output,
        } => {
            let spike_train = MultiChannelSpikeTrain::load_from(&input)?;
            log::info!(
                "Spike train loading: done! {} spikes over {} cells",
                spike_train.num_spikes(),
                spike_train.num_channels()
            );

            let num_bins = num_bins.unwrap_or((tstop / dt) as usize);
            let estimator = SynchronyEstimator::new(dt, num_bins, tstop)?;
            log::info!(
                "Binning over [0, {}] ms into {} bins of {} ms",
                estimator.tstop(),
                estimator.num_bins(),
                estimator.dt()
            );
            let synchrony = estimator.measure_with_progress(spike_train.as_slice(), |i, n| {
                if i % 100 == 0 {
                    log::debug!("Computing correlations... {}/{}", i, n);
                }
            })?;

            match output {
                Some(path) => {
                    write_json(&path, &synchrony)?;
                    log::info!("Synchrony saving: done! Saved to {}", path.display());
                }
                None => println!("{} {}", synchrony.mean, synchrony.std),
            }
        }
        Command::Decimate {
            input,
            output,
            factor,
            order,
            critical_factor,
            design,
            ripple_db,
        } => {
            let channels: Vec<Vec<f64>> = read_json(&input)?;
            log::info!("Signal loading: done! {} channels", channels.len());

            let decimator = Decimator {
                factor,
                order,
                critical_factor,
                design: match design {
                    Design::Butter => FilterDesign::Butterworth,
                    Design::Cheby1 => FilterDesign::Chebyshev1 { ripple_db },
                },
            };
            let decimated = decimator.decimate_channels(&channels)?;

            write_json(&output, &decimated)?;
            log::info!("Decimation: done! Saved to {}", output.display());
        }
    }
    Ok(())
}

fn init_logging(args: &Args) -> Result<(), SyncError> {
    let level = args
        .log_level
        .parse::<LevelFilter>()
        .map_err(|e| SyncError::InvalidParameter(e.to_string()))?;
    let encoder = Box::new(PatternEncoder::new("{l} - {m}\n"));

    let appender = match &args.log_file {
        Some(path) => {
            let logfile = FileAppender::builder()
                .encoder(encoder)
                .build(path)
                .map_err(|e| SyncError::IOError(e.to_string()))?;
            Appender::builder().build("log", Box::new(logfile))
        }
        None => {
            let console = ConsoleAppender::builder().encoder(encoder).build();
            Appender::builder().build("log", Box::new(console))
        }
    };

    let config = Config::builder()
        .appender(appender)
        .build(Root::builder().appender("log").build(level))
        .map_err(|e| SyncError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SyncError::IOError(e.to_string()))?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SyncError> {
    let file = File::open(path).map_err(|e| SyncError::IOError(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| SyncError::IOError(e.to_string()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SyncError> {
    let file = File::create(path).map_err(|e| SyncError::IOError(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| SyncError::IOError(e.to_string()))?;
    writer.flush().map_err(|e| SyncError::IOError(e.to_string()))
}
