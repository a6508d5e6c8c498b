//! 파일 집합 모듈
//!
//! 여러 입력 명세에서 모은 경로를 발견 순서대로 중복 없이 보관합니다.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// 순서를 보존하는 중복 제거 파일 집합
///
/// 경로 비교는 정확한 일치만 사용합니다 (`.`/`..`, 심볼릭 링크 정규화 없음).
#[derive(Debug, Default, Clone)]
pub struct FileSet {
    paths: IndexSet<PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 경로 추가. 이미 있으면 무시하고 false 반환
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    /// 여러 경로를 순서대로 추가
    pub fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) {
        self.paths.extend(paths);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// 발견 순서의 경로 벡터로 변환
    pub fn into_vec(self) -> Vec<PathBuf> {
        self.paths.into_iter().collect()
    }
}

impl FromIterator<PathBuf> for FileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = indexmap::set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
