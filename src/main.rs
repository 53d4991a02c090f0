use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use waybill_ocr::args::{Args, Mode};
use waybill_ocr::config::PipelineConfig;
use waybill_ocr::error::PipelineResult;
use waybill_ocr::evaluate::evaluate_results;
use waybill_ocr::highlight::draw_highlight;
use waybill_ocr::ocr::{OcrEngine, OcrRequest, ReplayOcrEngine};
use waybill_ocr::preprocess::preprocess_image;
use waybill_ocr::text_matching::PatternMatcher;
use waybill_ocr::{PipelineError, batch};

fn init_logging(debug_mode: bool) {
    let default_level = if debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(exit) => return exit.exit_code(),
    };
    init_logging(args.debug_mode);

    let mut config = PipelineConfig::default();
    args.apply_to(&mut config);
    let engine: Arc<dyn OcrEngine> = Arc::new(ReplayOcrEngine::default());

    let outcome = match &args.mode {
        Mode::Batch => run_batch(config, engine),
        Mode::Evaluate => run_evaluate(&config),
        Mode::Single(path) => run_single(
            path,
            args.highlight_out.as_deref(),
            &config,
            engine.as_ref(),
        ),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_batch(config: PipelineConfig, engine: Arc<dyn OcrEngine>) -> PipelineResult<()> {
    let rt = tokio::runtime::Runtime::new().map_err(|source| PipelineError::Runtime { source })?;
    let report = rt.block_on(batch::process_dataset(config, engine))?;

    println!(
        "✅ Processed {}/{} images ({} failed)",
        report.processed.len(),
        report.total(),
        report.failed.len()
    );
    for (path, e) in &report.failed {
        println!("   ✗ {}: {e}", path.display());
    }
    Ok(())
}

fn run_evaluate(config: &PipelineConfig) -> PipelineResult<()> {
    println!("Looking for JSON files in: {}", config.batch.json_out.display());
    let summary = evaluate_results(&config.batch.json_out)?;
    if summary.total == 0 {
        println!("❌ No JSON files found in {}", config.batch.json_out.display());
        return Ok(());
    }
    println!("\n{summary}\n");
    Ok(())
}

fn run_single(
    path: &Path,
    highlight_out: Option<&Path>,
    config: &PipelineConfig,
    engine: &dyn OcrEngine,
) -> PipelineResult<()> {
    let prepared = preprocess_image(path, &config.preprocess)?;
    let detections = engine.recognize(&OcrRequest::new(&prepared.processed).with_source(path))?;
    let result = PatternMatcher::new(config.matcher.clone()).extract_target_from_ocr(detections);

    match &result.target_line {
        Some(line) => {
            println!("🔎 Extracted target line: {line}");
            println!("   Confidence: {:.3}", result.confidence);
        }
        None => println!("❌ No `_1_` pattern detected in {}", path.display()),
    }
    log::debug!("{} OCR lines considered", result.all_lines.len());

    if let Some(out) = highlight_out {
        let highlighted = draw_highlight(
            &prepared.original,
            result.target_line.as_deref(),
            &result.all_lines,
        );
        highlighted
            .save(out)
            .map_err(|source| PipelineError::ImageSave {
                path: out.to_path_buf(),
                source,
            })?;
        println!("🖼️ Highlighted image saved to {}", out.display());
    }
    Ok(())
}
