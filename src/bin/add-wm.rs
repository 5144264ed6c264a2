use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use photo_watermark::{
    ProcessOptions, ProcessResult, ResampleFilter, WatermarkEngine, DEFAULT_BRIGHTNESS_DELTA,
    DEFAULT_CANVAS_SIZE, DEFAULT_WATERMARK_PATH,
};

#[derive(Parser)]
#[command(
    name = "add-wm",
    about = "Brighten, resize and watermark every photo in a directory",
    version,
    after_help = "Outputs are written as <index>-<name> next to the originals unless \
                  --output is given. Only *.png, *.jpg and *.jpeg files are picked up \
                  (extensions are case-sensitive)."
)]
struct Cli {
    /// Directory of images to watermark
    #[arg(short, long)]
    dir: PathBuf,

    /// Watermark image with an alpha channel
    #[arg(short, long, default_value = DEFAULT_WATERMARK_PATH)]
    watermark: PathBuf,

    /// Output directory (default: same as --dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Brightness increase applied to every photo (0-255)
    #[arg(short, long, default_value_t = DEFAULT_BRIGHTNESS_DELTA)]
    brightness: u8,

    /// Edge length of the square output canvas
    #[arg(short, long, default_value_t = DEFAULT_CANVAS_SIZE)]
    size: u32,

    /// Canvas width, overrides --size
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height, overrides --size
    #[arg(long)]
    height: Option<u32>,

    /// Resampling filter
    #[arg(long, value_enum, default_value_t = ResampleFilter::Area)]
    filter: ResampleFilter,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli);

    let opts = ProcessOptions {
        brightness: cli.brightness,
        canvas_width: cli.width.unwrap_or(cli.size),
        canvas_height: cli.height.unwrap_or(cli.size),
        filter: cli.filter,
    };

    if !cli.dir.is_dir() {
        log::error!("Input directory does not exist: {}", cli.dir.display());
        process::exit(1);
    }

    let engine = match WatermarkEngine::new(&cli.watermark, opts) {
        Ok(e) => e,
        Err(e) => {
            log::error!("Fatal: {e}");
            process::exit(1);
        }
    };

    let results = engine.process_directory(&cli.dir, cli.output.as_deref());

    let mut success_count = 0u32;
    let mut fail_count = 0u32;
    for r in &results {
        print_result(r, cli.quiet);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if !cli.quiet {
        eprintln!();
        eprint!("[Summary] Watermarked: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

fn print_result(result: &ProcessResult, quiet: bool) {
    let filename = display_name(&result.path);

    if result.success {
        if !quiet {
            match &result.output {
                Some(out) => eprintln!("[OK] {filename} -> {}", display_name(out)),
                None => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }
}
