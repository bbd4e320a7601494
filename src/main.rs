use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};

use handfont::{
    FontBuilder, LetterAlphabet, OutputArena, SegmentationResult, Segmenter, SegmenterConfig,
};

#[derive(Parser)]
#[command(name = "handfont")]
#[command(about = "Turn a scanned sheet of handwritten Hebrew letters into a font")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a sheet into one image per letter
    Segment {
        /// Path to the scanned sheet (PNG or JPEG)
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Save per-stage debug images to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Segment, trace with potrace, and compile with FontForge
    Font {
        /// Path to the scanned sheet (PNG or JPEG)
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Where to write the TrueType font
        #[arg(long, value_name = "FILE")]
        ttf: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Letter output directory (default: a fresh directory under ./handfont-output)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// JSON file overriding segmentation parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl OutputArgs {
    fn segmenter(&self) -> anyhow::Result<Segmenter> {
        let config = match &self.config {
            Some(path) => SegmenterConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SegmenterConfig::default(),
        };
        Ok(Segmenter::new(config, LetterAlphabet::hebrew()))
    }

    /// Letter directory and svg directory for this run.
    fn directories(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        match &self.out {
            Some(dir) => Ok((dir.clone(), dir.join("svg"))),
            None => {
                let arena = OutputArena::create(Path::new("handfont-output"))?;
                info!("output arena {}", arena.dir().display());
                Ok((arena.letters_dir(), arena.svg_dir()))
            }
        }
    }
}

fn print_result(result: &SegmentationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("\n=== Segmentation Result ===");
    println!("Status: {:?}", result.status);
    println!("Letters: {}", result.letter_count);
    if let Some(dir) = &result.output_dir {
        println!("Output: {}", dir.display());
    }
    if let Some(message) = &result.message {
        println!("{message}");
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Segment {
            image_path,
            output,
            debug_out,
            json,
        } => {
            let mut segmenter = output.segmenter()?;
            if let Some(debug_dir) = debug_out {
                segmenter = segmenter.with_debug(debug_dir);
            }
            let (letters_dir, _) = output.directories()?;

            let result = segmenter.segment(&image_path, &letters_dir);
            print_result(&result, json)?;
            Ok(if result.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Font {
            image_path,
            ttf,
            output,
        } => {
            let segmenter = output.segmenter()?;
            let (letters_dir, svg_dir) = output.directories()?;

            let outcome = match segmenter.try_segment(&image_path, &letters_dir) {
                Ok(outcome) => outcome,
                Err(err) => {
                    let dir = letters_dir.exists().then(|| letters_dir.clone());
                    print_result(&SegmentationResult::failed(&err, dir), false)?;
                    return Ok(ExitCode::FAILURE);
                }
            };
            if outcome.letters.len() < segmenter.alphabet().len() {
                warn!(
                    "continuing with a partial alphabet ({} of {} letters)",
                    outcome.letters.len(),
                    segmenter.alphabet().len()
                );
            }

            // Only this run's crops, whatever else the directory holds.
            let font = FontBuilder::with_system_tools()
                .with_alphabet(segmenter.alphabet().clone())
                .build_letters(&outcome.letter_files(), Some(svg_dir.as_path()))
                .context("building font")?;
            font.write_to(&ttf)?;

            println!("\n=== Font Build Result ===");
            println!("Glyphs: {}", font.glyph_count);
            if !font.skipped.is_empty() {
                println!("Skipped (empty outline): {}", font.skipped.join(", "));
            }
            println!("Font: {}", ttf.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    run(cli)
}
