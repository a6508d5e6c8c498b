//! 파일 변환 모듈
//!
//! NDJSON 파일 하나를 읽어 envelope 을 검사하고 HTML 리포트로 기록합니다.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::report::ReportFormat;
use crate::resolver::{PathResolver, DEFAULT_EXTENSION};

/// 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 출력 디렉토리 (None 이면 입력 파일과 같은 디렉토리)
    pub output_dir: Option<PathBuf>,
    /// 병합 출력 이름 (Some 이면 병합 단계 실행)
    pub merged_name: Option<String>,
    /// 병합 임시 파일 디렉토리
    pub temp_dir: PathBuf,
    /// 디렉토리 탐색 시 찾을 확장자
    pub extension: String,
    /// 최대 디렉토리 탐색 깊이
    pub max_depth: Option<usize>,
    /// 상대 경로/글로브 기준 디렉토리 (None 이면 프로세스 작업 디렉토리)
    pub base_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            merged_name: None,
            temp_dir: std::env::temp_dir(),
            extension: DEFAULT_EXTENSION.to_string(),
            max_depth: None,
            base_dir: None,
        }
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 출력 디렉토리 설정
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// 병합 출력 이름 설정 (빈 문자열은 병합 안 함)
    pub fn with_merged_name(mut self, merged_name: Option<String>) -> Self {
        self.merged_name = merged_name.filter(|name| !name.trim().is_empty());
        self
    }

    /// 임시 디렉토리 설정
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// 확장자 설정
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// 최대 탐색 깊이 설정
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 기준 디렉토리 설정
    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// 옵션에 맞는 경로 해석기 생성
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new()
            .with_base_dir(self.base_dir.clone())
            .with_extension(self.extension.clone())
            .with_max_depth(self.max_depth)
    }
}

/// 변환 성공 요약
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    /// 입력 파일 경로
    pub input: PathBuf,
    /// 생성된 리포트 경로
    pub output: PathBuf,
    /// 렌더링된 envelope 수
    pub messages: usize,
    /// 입력 파일 크기
    pub bytes_read: u64,
    /// 출력 파일 크기
    pub bytes_written: u64,
}

/// 입력 파일에 대응하는 출력 경로 계산
///
/// 마지막 확장자만 바꿉니다.
///
/// # Examples
/// ```
/// use ndjson2html::processor::output_path_for;
/// use std::path::{Path, PathBuf};
///
/// let out = output_path_for(Path::new("runs/a.b.ndjson"), None, "html");
/// assert_eq!(out, PathBuf::from("runs/a.b.html"));
///
/// let out = output_path_for(Path::new("runs/a.ndjson"), Some(Path::new("site")), "html");
/// assert_eq!(out, PathBuf::from("site/a.html"));
/// ```
pub fn output_path_for(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let mut file_name = input.file_stem().unwrap_or_default().to_os_string();
    file_name.push(".");
    file_name.push(extension);

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(file_name)
}

/// NDJSON 파일 하나를 리포트로 변환
///
/// 실패하면 그때까지 기록된 출력 파일은 그대로 남습니다.
///
/// # Arguments
/// * `input` - 변환할 NDJSON 파일
/// * `output_dir` - 출력 디렉토리 (없으면 생성)
/// * `format` - 디코딩/렌더링 포맷
pub fn convert_file(
    input: &Path,
    output_dir: Option<&Path>,
    format: &dyn ReportFormat,
) -> Result<ConvertSummary> {
    let output = output_path_for(input, output_dir, format.extension());

    // 출력 파일을 만들면 입력이 비워지므로 같은 파일이면 거부
    if is_same_file(input, &output) {
        return Err(ConvertError::FileOpen {
            file: output,
            reason: "output path is the same as the input file".to_string(),
        });
    }

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let out_file = File::create(&output).map_err(|e| ConvertError::FileOpen {
        file: output.clone(),
        reason: e.to_string(),
    })?;
    let mut writer = BufWriter::new(out_file);

    let in_file = File::open(input).map_err(|e| ConvertError::FileOpen {
        file: input.to_path_buf(),
        reason: e.to_string(),
    })?;
    let bytes_read = in_file.metadata().map(|m| m.len()).unwrap_or(0);

    format.begin(&mut writer)?;

    let mut messages = 0;
    for envelope in format.decode(Box::new(BufReader::new(in_file))) {
        match envelope? {
            Some(envelope) if !envelope.is_empty() => {
                format.render(&envelope, &mut writer)?;
                messages += 1;
            }
            _ => {
                return Err(ConvertError::DataFormat {
                    file: input.to_path_buf(),
                })
            }
        }
    }

    format.finish(&mut writer)?;
    writer.flush()?;

    let bytes_written = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    debug!(
        input = %input.display(),
        output = %output.display(),
        messages,
        "converted file"
    );

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output,
        messages,
        bytes_read,
        bytes_written,
    })
}

fn is_same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
