//! 에러 타입 정의 모듈
//!
//! ndjson2html에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 모든 에러는 입력 명세 하나 또는 파일 하나 단위로 잡혀서 기록됩니다.

use std::path::PathBuf;
use thiserror::Error;

/// ndjson2html에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 디렉토리 안에 변환할 파일이 없음
    #[error("No {extension} files found in Directory: {dir}")]
    NoMatchingFiles { dir: PathBuf, extension: String },

    /// 파일, 디렉토리, 글로브 어느 것에도 해당하지 않음
    #[error("File or Directory: {spec} not found.")]
    NotFound { spec: String },

    /// 유효하지 않은 글로브 패턴
    #[error("Invalid glob pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 파일 열기 실패
    #[error("Could not open {file}: {reason}")]
    FileOpen { file: PathBuf, reason: String },

    /// null 이거나 비어 있는 envelope
    #[error("Empty Envelope or non-Ndjson Json data encountered in {file}.")]
    DataFormat { file: PathBuf },

    /// NDJSON 레코드 디코딩 실패
    #[error("Invalid NDJSON record at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// 그 밖의 입출력 실패
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// 입력 명세 해석 단계의 에러인지 확인
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ConvertError::NoMatchingFiles { .. }
                | ConvertError::NotFound { .. }
                | ConvertError::InvalidPattern { .. }
        )
    }
}

/// ndjson2html 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_classification() {
        let not_found = ConvertError::NotFound {
            spec: "missing.ndjson".to_string(),
        };
        let data = ConvertError::DataFormat {
            file: PathBuf::from("a.ndjson"),
        };

        assert!(not_found.is_resolution());
        assert!(!data.is_resolution());
    }

    #[test]
    fn test_no_matching_files_names_directory() {
        let error = ConvertError::NoMatchingFiles {
            dir: PathBuf::from("/data/reports"),
            extension: "ndjson".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No ndjson files found in Directory: /data/reports"
        );
    }
}
