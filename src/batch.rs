//! 일괄 처리 모듈
//!
//! 입력 명세 해석, 선택적 병합, 파일별 변환을 순서대로 실행하고
//! 항목별 결과를 하나의 종료 코드로 모읍니다.

use colored::Colorize;
use indicatif::ProgressBar;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::fileset::FileSet;
use crate::merge::MergeArtifact;
use crate::processor::{convert_file, ConvertOptions, ConvertSummary};
use crate::report::ReportFormat;
use crate::stats::Statistics;

/// 실패가 발생한 처리 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Merge,
    Convert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Merge => write!(f, "merge"),
            Stage::Convert => write!(f, "convert"),
        }
    }
}

/// 항목 하나의 처리 결과
#[derive(Debug)]
pub enum Outcome {
    /// 파일 변환 성공
    Converted(ConvertSummary),
    /// 입력 명세, 병합 또는 파일 처리 실패
    Failed {
        subject: String,
        stage: Stage,
        error: ConvertError,
    },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// 실패 대상 (명세 또는 파일 경로)
    pub fn subject(&self) -> String {
        match self {
            Outcome::Converted(summary) => summary.input.display().to_string(),
            Outcome::Failed { subject, .. } => subject.clone(),
        }
    }

    /// 운영자에게 보여줄 메시지
    pub fn message(&self) -> String {
        match self {
            Outcome::Converted(summary) => format!(
                "Conversion of {} completed successfully.",
                summary.input.display()
            ),
            Outcome::Failed { subject, error, .. } => {
                format!("An error occurred while processing {}.\n{}", subject, error)
            }
        }
    }

    fn print(&self) {
        let message = self.message();
        match self {
            Outcome::Converted(_) => println!("{}", message.green()),
            Outcome::Failed { .. } => {
                let (header, detail) = message
                    .split_once('\n')
                    .unwrap_or((message.as_str(), ""));
                println!("{}", header.red());
                println!("{}", detail.dimmed());
            }
        }
    }
}

/// 일괄 처리 결과 누적기
///
/// 한 번 실패로 표시되면 이후 성공으로 되돌아가지 않습니다.
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<Outcome>,
    failed: bool,
    stats: Statistics,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 결과 기록
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.is_failure() {
            self.failed = true;
        }
        self.outcomes.push(outcome);
    }

    /// 하나라도 실패했는지 확인
    pub fn is_failure(&self) -> bool {
        self.failed
    }

    /// 프로세스 종료 코드 (성공 0, 실패 -1)
    pub fn exit_code(&self) -> i32 {
        if self.failed {
            -1
        } else {
            0
        }
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// 실패한 결과만 반환
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// 변환에 성공한 파일 요약만 반환
    pub fn converted(&self) -> impl Iterator<Item = &ConvertSummary> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Converted(summary) => Some(summary),
            Outcome::Failed { .. } => None,
        })
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
}

/// 해석 → 병합 → 변환 → 정리 순서로 일괄 처리 실행
pub struct BatchRunner<F> {
    options: ConvertOptions,
    format: F,
    progress: Option<ProgressBar>,
    echo: bool,
}

impl<F: ReportFormat> BatchRunner<F> {
    pub fn new(options: ConvertOptions, format: F) -> Self {
        Self {
            options,
            format,
            progress: None,
            echo: false,
        }
    }

    /// 변환 진행률 바 설정
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 항목별 결과를 표준 출력에 즉시 출력할지 설정
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// 전체 일괄 처리 실행
    ///
    /// 항목 단위 에러는 모두 `BatchResult` 에 기록되고 호출자에게 전파되지 않습니다.
    pub fn run(&self, inputs: &[String]) -> BatchResult {
        let mut result = BatchResult::new();

        let files = self.resolve(inputs, &mut result);
        let (working_set, artifact) = self.prepare(files, &mut result);
        self.convert_all(&working_set, &mut result);

        // 병합 임시 파일 정리
        drop(artifact);

        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }

        result
    }

    /// 모든 입력 명세를 해석하여 중복 없는 파일 집합 생성
    pub fn resolve(&self, inputs: &[String], result: &mut BatchResult) -> FileSet {
        let resolver = self.options.resolver();
        let mut files = FileSet::new();
        result.stats.total_specs += inputs.len();

        for spec in inputs {
            match resolver.resolve(spec) {
                Ok(paths) => files.extend(paths),
                Err(error) => {
                    warn!(spec = %spec, error = %error, "could not resolve input");
                    result.stats.failed_specs += 1;
                    self.record(
                        result,
                        Outcome::Failed {
                            subject: spec.clone(),
                            stage: Stage::Resolve,
                            error,
                        },
                    );
                }
            }
        }

        debug!(count = files.len(), "resolved input files");
        files
    }

    /// 병합이 요청되면 임시 파일을 만들고 작업 집합을 그 파일 하나로 교체
    fn prepare(
        &self,
        files: FileSet,
        result: &mut BatchResult,
    ) -> (Vec<PathBuf>, Option<MergeArtifact>) {
        let merged_name = match self.options.merged_name {
            Some(ref name) => name,
            None => return (files.into_vec(), None),
        };

        match MergeArtifact::create(&self.options.temp_dir, merged_name, &files) {
            Ok(artifact) => (vec![artifact.path().to_path_buf()], Some(artifact)),
            Err(error) => {
                warn!(merged = %merged_name, error = %error, "merge failed");
                self.record(
                    result,
                    Outcome::Failed {
                        subject: merged_name.clone(),
                        stage: Stage::Merge,
                        error,
                    },
                );
                (Vec::new(), None)
            }
        }
    }

    /// 작업 집합의 파일을 하나씩 변환
    fn convert_all(&self, working_set: &[PathBuf], result: &mut BatchResult) {
        result.stats.total_files += working_set.len();
        if let Some(ref pb) = self.progress {
            pb.set_length(working_set.len() as u64);
        }

        let output_dir = self.options.output_dir.as_deref();
        for file in working_set {
            match convert_file(file, output_dir, &self.format) {
                Ok(summary) => {
                    result.stats.converted += 1;
                    result.stats.messages += summary.messages;
                    result.stats.bytes_read += summary.bytes_read;
                    result.stats.bytes_written += summary.bytes_written;
                    self.record(result, Outcome::Converted(summary));
                }
                Err(error) => {
                    warn!(file = %file.display(), error = %error, "conversion failed");
                    result.stats.failed += 1;
                    self.record(
                        result,
                        Outcome::Failed {
                            subject: file.display().to_string(),
                            stage: Stage::Convert,
                            error,
                        },
                    );
                }
            }

            if let Some(ref pb) = self.progress {
                pb.inc(1);
            }
        }
    }

    fn record(&self, result: &mut BatchResult, outcome: Outcome) {
        if self.echo {
            match self.progress {
                Some(ref pb) => pb.suspend(|| outcome.print()),
                None => outcome.print(),
            }
        }
        result.record(outcome);
    }
}
