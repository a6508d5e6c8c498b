//! ndjson2html - NDJSON TO HTML REPORT CONVERTER
//!
//! 파일, 디렉토리, 글로브 패턴으로 지정한 NDJSON 메시지 파일들을 HTML 리포트로
//! 일괄 변환하는 CLI 도구입니다.
//!
//! # 처리 순서
//!
//! 1. **해석**: 입력 명세마다 파일 목록을 찾고 발견 순서대로 중복 제거
//! 2. **병합** (선택): 모든 파일의 비어 있지 않은 줄을 임시 NDJSON 파일 하나로 합침
//! 3. **변환**: 파일마다 envelope 을 디코딩하고 검사한 뒤 `.html` 로 렌더링
//! 4. **정리**: 임시 파일 삭제, 하나라도 실패했으면 종료 코드 -1
//!
//! 명세 하나나 파일 하나의 실패는 그 항목만 중단시키고 나머지는 계속 처리됩니다.
//!
//! # 예제
//!
//! ```bash
//! # 파일 하나 변환
//! ndjson2html results/run.ndjson
//!
//! # 디렉토리 전체를 다른 폴더로 출력
//! ndjson2html results/ --outputDirectory site
//!
//! # 글로브로 찾은 파일들을 하나의 리포트로 병합
//! ndjson2html "results/**/*.ndjson" --mergedFile report.html
//! ```

pub mod batch;
pub mod cli;
pub mod error;
pub mod fileset;
pub mod merge;
pub mod message;
pub mod processor;
pub mod report;
pub mod resolver;
pub mod stats;

// Re-exports for convenient access
pub use batch::{BatchResult, BatchRunner, Outcome, Stage};
pub use cli::Args;
pub use error::{ConvertError, Result};
pub use fileset::FileSet;
pub use merge::MergeArtifact;
pub use message::{Envelope, MessageKind, NdjsonReader};
pub use processor::{convert_file, output_path_for, ConvertOptions, ConvertSummary};
pub use report::{HtmlReport, ReportFormat};
pub use resolver::PathResolver;
pub use stats::{format_bytes, Statistics};
