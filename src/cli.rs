//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::processor::ConvertOptions;
use crate::resolver::DEFAULT_EXTENSION;

/// ndjson2html CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "ndjson2html",
    version,
    about = "Converts NDJSON files to HTML files.",
    long_about = r#"
NDJSON TO HTML REPORT CONVERTER
===============================

파일, 디렉토리, 글로브 패턴으로 지정한 NDJSON 메시지 파일들을
HTML 리포트로 변환합니다.

  • 디렉토리는 하위 폴더까지 *.ndjson 파일을 찾습니다
  • 파일도 디렉토리도 아니면 현재 디렉토리 기준 글로브로 해석합니다
  • --mergedFile 을 주면 모든 입력을 하나의 리포트로 합칩니다
  • 하나라도 실패하면 종료 코드는 -1 입니다

예제:
  ndjson2html results/run.ndjson
  ndjson2html results/ --outputDirectory site
  ndjson2html "results/**/*.ndjson" --mergedFile report.html
"#
)]
pub struct Args {
    /// The NDJSON files, directories or glob patterns to convert
    #[arg(required = true, num_args = 1.., value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// The output directory. Defaults to the directory of each input file
    #[arg(long = "outputDirectory", visible_alias = "output-directory", value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Merge all input files into a single report with this name
    #[arg(long = "mergedFile", visible_alias = "merged-file", value_name = "NAME")]
    pub merged_file: Option<String>,

    /// File extension searched for inside directories
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Maximum directory depth to search
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Only list the files that would be converted
    #[arg(long)]
    pub dry_run: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a processing summary after the run
    #[arg(long)]
    pub stats: bool,

    /// Write every failure to this log file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 인자를 변환 옵션으로 변환
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_output_dir(self.output_directory.clone())
            .with_merged_name(self.merged_file.clone())
            .with_extension(self.extension.clone())
            .with_max_depth(self.max_depth)
    }
}
