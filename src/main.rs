//! ndjson2html - NDJSON TO HTML REPORT CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use ndjson2html::{
    batch::{BatchResult, BatchRunner, Outcome},
    cli::Args,
    report::HtmlReport,
};

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    let runner = BatchRunner::new(args.to_options(), HtmlReport::new()).with_echo(true);

    // 드라이런 모드
    if args.dry_run {
        let mut result = BatchResult::new();
        let files = runner.resolve(&args.inputs, &mut result);
        print_dry_run(files.iter().map(|p| p.as_path()), runner.options().merged_name.as_deref());
        finish(&args, &result)?;
        process::exit(result.exit_code());
    }

    let runner = runner.with_progress(create_progress_bar());
    let result = runner.run(&args.inputs);

    finish(&args, &result)?;
    process::exit(result.exit_code());
}

/// 로그 초기화 (RUST_LOG 가 있으면 우선)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 통계 출력 및 에러 로그 작성
fn finish(args: &Args, result: &BatchResult) -> Result<()> {
    if args.stats {
        result.stats().print_summary();
    }

    if let Some(ref log_path) = args.log {
        write_error_log(log_path, result)
            .with_context(|| format!("could not write error log {:?}", log_path))?;
    }

    std::io::stdout().flush()?;
    Ok(())
}

/// 드라이런 출력
fn print_dry_run<'a>(files: impl Iterator<Item = &'a Path>, merged_name: Option<&str>) {
    let files: Vec<&Path> = files.collect();

    println!("\n{}", "📋 Files to convert:".bright_cyan());
    for (i, path) in files.iter().enumerate() {
        println!("  {}. {}", i + 1, path.display());
    }

    if let Some(name) = merged_name {
        println!(
            "\n{} merged into a single report: {}",
            "ℹ️".bright_blue(),
            name.bright_green()
        );
    }
    println!(
        "\n{} {} file(s) would be converted.",
        "ℹ️".bright_blue(),
        files.len().to_string().bright_green()
    );
}

/// 진행률 바 생성
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, result: &BatchResult) -> Result<()> {
    let mut log_file = File::create(log_path)?;
    let failures: Vec<_> = result.failures().collect();

    writeln!(log_file, "ndjson2html error log")?;
    writeln!(log_file, "Created: {}", unix_timestamp())?;
    writeln!(log_file, "Failures: {}", failures.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for outcome in failures {
        if let Outcome::Failed { stage, .. } = outcome {
            writeln!(log_file, "\n[{}] {}", stage, outcome.message())?;
        }
    }

    Ok(())
}

/// 현재 시간 문자열 반환
fn unix_timestamp() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
