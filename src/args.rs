use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::PipelineConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Batch,
    Evaluate,
    Single(PathBuf),
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub input_dir: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
    pub screenshot_out: Option<PathBuf>,
    pub highlight_out: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub threshold: Option<f64>,
}

/// Why parsing stopped without producing [`Args`]
#[derive(Debug, PartialEq)]
pub enum ArgsExit {
    Help,
    Version,
    Invalid(String),
}

impl ArgsExit {
    /// Process exit code: help and version succeed, rejected arguments fail
    pub fn exit_code(&self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ArgsExit::Invalid(_))
    }
}

impl Args {
    /// Parse the process arguments, printing help or errors when parsing stops
    pub fn parse() -> Result<Self, ArgsExit> {
        let parsed = Self::parse_from(env::args().skip(1));
        match &parsed {
            Ok(_) => {}
            Err(ArgsExit::Help) => print_help(),
            Err(ArgsExit::Version) => println!("Waybill OCR v{}", env!("CARGO_PKG_VERSION")),
            Err(ArgsExit::Invalid(message)) => {
                eprintln!("❌ {message}");
                print_help();
            }
        }
        parsed
    }

    pub fn parse_from<I>(args: I) -> Result<Self, ArgsExit>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args {
            mode: Mode::Batch,
            debug_mode: false,
            input_dir: None,
            json_out: None,
            screenshot_out: None,
            highlight_out: None,
            jobs: None,
            threshold: None,
        };

        for arg in args {
            if arg == "--help" || arg == "-h" {
                return Err(ArgsExit::Help);
            } else if arg == "--version" || arg == "-v" {
                return Err(ArgsExit::Version);
            } else if arg == "--debug" {
                parsed.debug_mode = true;
            } else if arg == "--batch" {
                parsed.mode = Mode::Batch;
            } else if arg == "--evaluate" || arg == "-e" {
                parsed.mode = Mode::Evaluate;
            } else if let Some(path) = arg.strip_prefix("--image=") {
                parsed.mode = Mode::Single(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--input=") {
                parsed.input_dir = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--json-out=") {
                parsed.json_out = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--screenshot-out=") {
                parsed.screenshot_out = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--highlight-out=") {
                parsed.highlight_out = Some(PathBuf::from(path));
            } else if let Some(val) = arg.strip_prefix("--jobs=") {
                match val.parse::<usize>() {
                    Ok(jobs) if jobs > 0 => parsed.jobs = Some(jobs),
                    _ => return Err(ArgsExit::Invalid(format!("Invalid jobs value: {val}"))),
                }
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                match val.parse::<f64>() {
                    Ok(t) if (0.0..=1.0).contains(&t) => parsed.threshold = Some(t),
                    _ => {
                        return Err(ArgsExit::Invalid(format!(
                            "Invalid threshold value: {val} (expected 0.0-1.0)"
                        )));
                    }
                }
            } else {
                return Err(ArgsExit::Invalid(format!("Unknown argument: {arg}")));
            }
        }

        Ok(parsed)
    }

    /// Override configuration defaults with whatever was given on the command line
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.input_dir {
            config.batch.input_dir = dir.clone();
        }
        if let Some(dir) = &self.json_out {
            config.batch.json_out = dir.clone();
        }
        if let Some(dir) = &self.screenshot_out {
            config.batch.screenshot_out = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            config.batch.max_concurrency = jobs;
        }
        if let Some(threshold) = self.threshold {
            config.matcher.fuzzy_threshold = threshold;
        }
    }
}

fn print_help() {
    println!("📦 Waybill OCR - extract the `_1_` line from shipping labels");
    println!();
    println!("USAGE:");
    println!("    waybill-ocr [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)              Process every image in the input folder");
    println!("    --batch                 Same as no flags");
    println!("    --evaluate, -e          Report accuracy over the saved JSON results");
    println!("    --image=<path>          Extract the target line from a single image");
    println!("    --highlight-out=<path>  With --image, save the highlighted image");
    println!("    --input=<dir>           Folder of .jpg/.jpeg/.png images (default: tests)");
    println!("    --json-out=<dir>        JSON results folder (default: results/json)");
    println!("    --screenshot-out=<dir>  Highlighted images folder (default: results/screenshots)");
    println!("    --jobs=N                Images processed in parallel (default: CPU count)");
    println!("    --threshold=F           Fuzzy match threshold 0.0-1.0 (default: 0.3)");
    println!("    --debug                 Enable debug logging");
    println!("    --help, -h              Show this help message");
    println!("    --version, -v           Show version information");
    println!();
    println!("OCR detections are replayed from <image>.ocr.json next to each image.");
    println!();
    println!("EXAMPLES:");
    println!("    waybill-ocr --input=labels");
    println!("    waybill-ocr --image=labels/label-01.jpg --highlight-out=out.jpg");
    println!("    waybill-ocr --evaluate --json-out=results/json");
}
