//! Command-line entry point: trim a local video to a sub-range.

use std::path::PathBuf;

use clap::Parser;

use cliptrim::core::range::{TrimBounds, TrimRange};
use cliptrim::core::time;
use cliptrim::export::engine::Preset;
use cliptrim::export::output::OutputLocation;
use cliptrim::TrimRequest;

#[derive(Parser, Debug)]
#[command(name = "cliptrim", version, about = "Trim a video to a sub-range, optionally dropping audio")]
struct Args {
    /// Source video file
    input: PathBuf,

    /// Trim start, in seconds
    #[arg(long, value_name = "SECONDS")]
    start: f64,

    /// Trim end, in seconds
    #[arg(long, value_name = "SECONDS")]
    end: f64,

    /// Drop the audio track from the output
    #[arg(long)]
    no_audio: bool,

    /// Output directory (the result is always written as output.mp4)
    #[arg(long, value_name = "DIR", default_value = "cliptrim-out")]
    out: PathBuf,

    /// Relocate the container index for progressive streaming
    #[arg(long)]
    network_optimized: bool,

    /// Minimum trim span, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
    min_duration: f64,

    /// Maximum trim span, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30.0)]
    max_duration: f64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let request = TrimRequest {
        range: TrimRange::new(time::from_seconds(args.start), time::from_seconds(args.end)),
        bounds: TrimBounds {
            min_span: time::from_seconds(args.min_duration),
            max_span: time::from_seconds(args.max_duration),
        },
        include_audio: !args.no_audio,
        preset: if args.network_optimized {
            Preset::NetworkOptimized
        } else {
            Preset::Passthrough
        },
        output: OutputLocation::new(&args.out),
    };

    let job = match cliptrim::trim(&args.input, request) {
        Ok(job) => job,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    match job.wait() {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            log::error!("trim failed: {}", err);
            std::process::exit(1);
        }
    }
}
