//! 입력 명세 해석 모듈
//!
//! 파일 경로, 디렉토리, 글로브 패턴을 실제 파일 경로 목록으로 바꿉니다.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};

/// 기본 입력 파일 확장자
pub const DEFAULT_EXTENSION: &str = "ndjson";

/// 입력 명세 하나를 파일 경로 목록으로 해석
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// 상대 경로와 글로브의 기준 디렉토리 (None 이면 프로세스 작업 디렉토리)
    base_dir: Option<PathBuf>,
    /// 디렉토리 탐색 시 찾을 확장자
    extension: String,
    /// 최대 디렉토리 탐색 깊이
    max_depth: Option<usize>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self {
            base_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            max_depth: None,
        }
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기준 디렉토리 설정
    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// 확장자 설정 (앞의 `.` 은 무시)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// 최대 탐색 깊이 설정
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 입력 명세 하나를 해석
    ///
    /// # Arguments
    /// * `spec` - 파일 경로, 디렉토리 경로 또는 글로브 패턴
    ///
    /// # Returns
    /// 발견된 파일 경로 목록. 아무것도 찾지 못하면 에러
    ///
    /// # Examples
    /// ```no_run
    /// use ndjson2html::resolver::PathResolver;
    ///
    /// let resolver = PathResolver::new();
    /// let files = resolver.resolve("reports/**/*.ndjson").unwrap();
    /// ```
    pub fn resolve(&self, spec: &str) -> Result<Vec<PathBuf>> {
        let location = self.locate(spec);

        if location.is_dir() {
            let files = self.scan_directory(&location);
            if files.is_empty() {
                return Err(ConvertError::NoMatchingFiles {
                    dir: location,
                    extension: self.extension.clone(),
                });
            }
            debug!(spec, count = files.len(), "resolved directory");
            return Ok(files);
        }

        if location.is_file() {
            debug!(spec, "resolved literal file");
            return Ok(vec![location]);
        }

        let files = self.expand_glob(spec)?;
        if files.is_empty() {
            return Err(ConvertError::NotFound {
                spec: spec.to_string(),
            });
        }
        debug!(spec, count = files.len(), "resolved glob pattern");
        Ok(files)
    }

    /// 명세를 경로로 변환 (기준 디렉토리가 없으면 그대로)
    fn locate(&self, spec: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(spec),
            None => PathBuf::from(spec),
        }
    }

    /// 디렉토리를 재귀 탐색하여 확장자가 일치하는 파일 수집
    fn scan_directory(&self, dir: &Path) -> Vec<PathBuf> {
        let walker = match self.max_depth {
            Some(max_depth) => WalkDir::new(dir).max_depth(max_depth),
            None => WalkDir::new(dir),
        };

        walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.eq_ignore_ascii_case(&self.extension))
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect()
    }

    /// 작업 디렉토리 기준으로 글로브 패턴 확장
    fn expand_glob(&self, spec: &str) -> Result<Vec<PathBuf>> {
        let pattern = if Path::new(spec).is_absolute() {
            spec.to_string()
        } else {
            let base = match &self.base_dir {
                Some(base) => base.clone(),
                None => std::env::current_dir()?,
            };
            format!(
                "{}{}{}",
                Pattern::escape(&base.to_string_lossy()),
                MAIN_SEPARATOR,
                spec
            )
        };

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let paths = glob::glob_with(&pattern, options).map_err(|e| {
            ConvertError::InvalidPattern {
                pattern: spec.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file())
            .collect())
    }
}
