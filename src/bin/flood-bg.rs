use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use flood_bg_removal::classifier::{DEFAULT_MIN_BRIGHTNESS, DEFAULT_TOLERANCE};
use flood_bg_removal::{
    default_output_path, inspect_file, BackgroundRemover, ProcessResult, RemovalOptions,
};

#[derive(Parser)]
#[command(
    name = "flood-bg",
    about = "Make the light background of a logo image transparent",
    version,
    after_help = "Simple usage: flood-bg <image>  (writes <name>_transparent.png)\n\n\
                  Background is detected from the four corners and flood-filled through\n\
                  light, near-grey pixels. Enclosed light areas are preserved."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output PNG file or directory (default: {name}_transparent.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Max channel difference for a pixel to count as grey (exclusive)
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: u8,

    /// Red channel must exceed this for a pixel to count as light
    #[arg(short = 'b', long, default_value_t = DEFAULT_MIN_BRIGHTNESS)]
    min_brightness: u8,

    /// Only report the input's alpha channel, do not modify anything
    #[arg(long)]
    inspect: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if cli.inspect {
        inspect(input_path);
        return;
    }

    if cli.tolerance == 0 {
        eprintln!("Error: Tolerance must be at least 1 (0 matches no pixel)");
        process::exit(1);
    }

    let opts = RemovalOptions {
        tolerance: cli.tolerance,
        min_brightness: cli.min_brightness,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let remover = BackgroundRemover::new(&opts);

    if !opts.quiet {
        let classifier = remover.classifier();
        eprintln!(
            "Background: |r-g|,|g-b|,|r-b| < {} and r > {}",
            classifier.tolerance(),
            classifier.min_brightness()
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: flood-bg <input_dir> -o <output_dir>");
            process::exit(1);
        };
        remover.process_directory(input_path, &output_dir)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![remover.process_file(input_path, &output_path)]
    };

    let mut success_count = 0u32;
    let mut unchanged_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.unchanged() {
            unchanged_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Cleaned: {success_count}");
        if unchanged_count > 0 {
            eprint!(", Unchanged: {unchanged_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn inspect(path: &Path) {
    match inspect_file(path) {
        Ok(report) => {
            let format = report
                .format
                .map_or_else(|| "unknown".to_string(), |f| format!("{f:?}"));
            eprintln!("Format: {format}, Color type: {:?}", report.color_type);
            match report.alpha_extrema {
                None => eprintln!("No alpha channel; the image cannot be transparent."),
                Some((min, max)) => {
                    eprintln!("Alpha extrema: ({min}, {max})");
                    if report.has_transparency() {
                        eprintln!("Image has transparency.");
                    } else {
                        eprintln!("Alpha channel is fully opaque; no transparency.");
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn print_result(result: &ProcessResult, opts: &RemovalOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.unchanged() {
        if !opts.quiet {
            eprintln!("[UNCHANGED] {filename}: {}", result.message);
        }
    } else if result.success {
        if !opts.quiet {
            match result.stats {
                Some(stats) => eprintln!(
                    "[OK] {filename} -> {} ({} px erased)",
                    result.output.display(),
                    stats.erased
                ),
                None => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    // [UNCHANGED] and [FAIL] lines already carry the message.
    if opts.verbose && result.success && !result.unchanged() && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
