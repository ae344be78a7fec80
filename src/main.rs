use arenascript::{
    Compiler, ConvertOptions, ExternalFlattener, Flattener, PassthroughFlattener, TrajectoryIndex,
};
use clap::Parser;
use log::LevelFilter;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Expand SVG-backed commands in a navigation script into plain simulator commands.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to convert, `-` for stdin
    script: PathBuf,
    /// 1-indexed trajectory of this run, used by sample-perimeter-from-svg-path
    #[arg(default_value_t = 1)]
    current_trajectory: u32,
    /// Number of trajectories in the batch
    #[arg(default_value_t = 1)]
    total_trajectories: u32,
    /// JSON options file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Flattening program, overrides the options file
    #[arg(long)]
    flattener: Option<String>,
    /// Read SVG files as they are; they must not contain curves
    #[arg(long)]
    no_flatten: bool,
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn report(err: &dyn Error) {
    eprintln!("error: {}", err);
    let mut cause = err.source();
    while let Some(c) = cause {
        eprintln!("  caused by: {}", c);
        cause = c.source();
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut options = match &args.config {
        Some(path) => ConvertOptions::from_file(path)?,
        None => ConvertOptions::default(),
    };
    if let Some(program) = args.flattener {
        options.flattener = program;
    }

    let flattener: Box<dyn Flattener> = if args.no_flatten {
        Box::new(PassthroughFlattener)
    } else {
        Box::new(ExternalFlattener::new(&options.flattener).with_args(options.flattener_args.clone()))
    };

    let (input, base_dir): (Box<dyn BufRead>, PathBuf) = if args.script == Path::new("-") {
        (Box::new(io::stdin().lock()), PathBuf::new())
    } else {
        let file = File::open(&args.script)
            .map_err(|e| format!("opening {}: {}", args.script.display(), e))?;
        let dir = args.script.parent().map(Path::to_path_buf).unwrap_or_default();
        (Box::new(BufReader::new(file)), dir)
    };

    let trajectory = TrajectoryIndex {
        current: args.current_trajectory,
        total: args.total_trajectories,
    };
    let mut compiler = Compiler::new(flattener, options)
        .base_dir(base_dir)
        .trajectory(trajectory);
    compiler.run(input, BufWriter::new(io::stdout().lock()))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(e.as_ref());
            ExitCode::FAILURE
        }
    }
}
