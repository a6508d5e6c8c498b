//! 병합 모듈
//!
//! 여러 NDJSON 파일의 비어 있지 않은 줄을 하나의 임시 파일로 이어 붙입니다.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::message::strip_bom;
use crate::resolver::DEFAULT_EXTENSION;

/// 병합 결과로 생긴 임시 NDJSON 파일
///
/// drop 시점에 파일을 삭제합니다. 삭제 실패는 무시합니다.
#[derive(Debug)]
pub struct MergeArtifact {
    path: PathBuf,
    lines: usize,
}

impl MergeArtifact {
    /// 병합 이름에서 임시 파일 경로 계산
    ///
    /// # Examples
    /// ```
    /// use ndjson2html::merge::MergeArtifact;
    /// use std::path::{Path, PathBuf};
    ///
    /// let path = MergeArtifact::path_for(Path::new("/tmp"), "report.html");
    /// assert_eq!(path, PathBuf::from("/tmp/report.ndjson"));
    /// ```
    pub fn path_for(temp_dir: &Path, merged_name: &str) -> PathBuf {
        let stem = Path::new(merged_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| merged_name.to_string());
        temp_dir.join(format!("{}.{}", stem, DEFAULT_EXTENSION))
    }

    /// 소스 파일들을 순서대로 병합하여 임시 파일 생성
    ///
    /// # Arguments
    /// * `temp_dir` - 임시 파일을 만들 디렉토리
    /// * `merged_name` - 최종 HTML 이름 (확장자는 무시)
    /// * `sources` - 병합할 파일 목록
    pub fn create<'a, I>(temp_dir: &Path, merged_name: &str, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let path = Self::path_for(temp_dir, merged_name);
        let file = File::create(&path).map_err(|e| ConvertError::FileOpen {
            file: path.clone(),
            reason: e.to_string(),
        })?;

        // 이후 단계가 실패해도 drop 에서 정리되도록 먼저 가드 생성
        let mut artifact = Self { path, lines: 0 };
        let mut writer = BufWriter::new(file);

        for source in sources {
            artifact.lines += copy_non_blank_lines(source, &mut writer)?;
        }
        writer.flush()?;

        debug!(
            path = %artifact.path.display(),
            lines = artifact.lines,
            "merged input files"
        );
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 병합된 줄 수
    pub fn lines(&self) -> usize {
        self.lines
    }
}

impl Drop for MergeArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "could not remove merge artifact");
        }
    }
}

/// 소스 파일에서 공백이 아닌 줄만 복사하고 복사한 줄 수 반환
fn copy_non_blank_lines<W: Write>(source: &Path, writer: &mut W) -> Result<usize> {
    let file = File::open(source).map_err(|e| ConvertError::FileOpen {
        file: source.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut copied = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = if index == 0 { strip_bom(&line) } else { &line };
        if line.trim().is_empty() {
            continue;
        }
        writeln!(writer, "{}", line)?;
        copied += 1;
    }

    Ok(copied)
}
