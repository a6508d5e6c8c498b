//! 통합 테스트 모듈
//!
//! ndjson2html의 전체 기능을 테스트합니다.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use ndjson2html::{BatchResult, BatchRunner, ConvertOptions, HtmlReport, Outcome, Stage};

const MINIMAL: &str = r#"{"meta":{"protocolVersion":"27.0.0"}}
{"source":{"uri":"features/minimal.feature","data":"Feature: minimal","mediaType":"text/x.cucumber.gherkin+plain"}}

{"testRunStarted":{"timestamp":{"seconds":0,"nanos":0}}}
{"testRunFinished":{"success":true,"timestamp":{"seconds":0,"nanos":1}}}
"#;

const HOOKS: &str = r#"{"meta":{"protocolVersion":"27.0.0"}}

{"hook":{"id":"0","sourceReference":{"uri":"hooks.ts"},"type":"BEFORE_TEST_CASE"}}

{"testRunStarted":{"timestamp":{"seconds":0,"nanos":0}}}
"#;

const EMPTY_ENVELOPE: &str = "{\"meta\":{}}\n{}\n";

/// 테스트용 NDJSON 파일 생성 헬퍼
fn create_ndjson_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn spec(path: &Path) -> String {
    path.display().to_string()
}

fn html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "html").unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn run(options: ConvertOptions, inputs: &[String]) -> BatchResult {
    BatchRunner::new(options, HtmlReport::new()).run(inputs)
}

fn messages(result: &BatchResult) -> Vec<String> {
    result.outcomes().iter().map(Outcome::message).collect()
}

mod resolution_tests {
    use super::*;

    #[test]
    fn test_overlapping_specs_deduplicated_in_first_seen_order() {
        let temp_dir = TempDir::new().unwrap();
        let b = create_ndjson_file(temp_dir.path(), "b.ndjson", MINIMAL);
        let a = create_ndjson_file(temp_dir.path(), "a.ndjson", MINIMAL);

        let options = ConvertOptions::new().with_base_dir(Some(temp_dir.path().to_path_buf()));
        let runner = BatchRunner::new(options, HtmlReport::new());

        let mut result = BatchResult::new();
        let files = runner.resolve(
            &[spec(&b), "*.ndjson".to_string(), spec(&a), spec(temp_dir.path())],
            &mut result,
        );

        assert!(!result.is_failure());
        let files = files.into_vec();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], b);
        assert_eq!(files[1], a);
    }

    #[test]
    fn test_missing_file_does_not_skip_other_specs() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_ndjson_file(temp_dir.path(), "good.ndjson", MINIMAL);
        let missing = temp_dir.path().join("notafile.ndjson");

        let result = run(
            ConvertOptions::new().with_base_dir(Some(temp_dir.path().to_path_buf())),
            &[spec(&missing), spec(&good)],
        );

        assert_eq!(result.exit_code(), -1);
        let lines = messages(&result);
        assert!(lines[0].starts_with(&format!(
            "An error occurred while processing {}.",
            missing.display()
        )));
        assert!(lines[0].contains("not found"));
        assert_eq!(
            lines[1],
            format!("Conversion of {} completed successfully.", good.display())
        );
        assert!(temp_dir.path().join("good.html").exists());
    }

    #[test]
    fn test_missing_directory_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no_such_directory");

        let result = run(ConvertOptions::new(), &[spec(&missing)]);

        assert_eq!(result.exit_code(), -1);
        assert!(messages(&result)[0]
            .contains(&format!("An error occurred while processing {}", missing.display())));
    }

    #[test]
    fn test_directory_without_ndjson_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "readme.txt", "hello");

        let result = run(ConvertOptions::new(), &[spec(temp_dir.path())]);

        assert_eq!(result.exit_code(), -1);
        match &result.outcomes()[0] {
            Outcome::Failed {
                subject,
                stage,
                error,
            } => {
                assert_eq!(subject, &spec(temp_dir.path()));
                assert_eq!(*stage, Stage::Resolve);
                assert!(error.to_string().contains(&spec(temp_dir.path())));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}

mod conversion_tests {
    use super::*;

    #[test]
    fn test_transforms_one_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_ndjson_file(temp_dir.path(), "minimal.ndjson", MINIMAL);

        let result = run(ConvertOptions::new(), &[spec(&input)]);

        assert_eq!(result.exit_code(), 0);
        assert_eq!(
            messages(&result),
            vec![format!(
                "Conversion of {} completed successfully.",
                input.display()
            )]
        );
        assert_eq!(html_files(temp_dir.path()), vec![temp_dir.path().join("minimal.html")]);

        let summary = result.converted().next().unwrap();
        assert_eq!(summary.messages, 4);
    }

    #[test]
    fn test_transforms_directory_recursively() {
        let temp_dir = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "minimal.ndjson", MINIMAL);
        create_ndjson_file(temp_dir.path(), "SubDirectory/Hooks.ndjson", HOOKS);

        let result = run(ConvertOptions::new(), &[spec(temp_dir.path())]);

        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.converted().count(), 2);
        assert!(temp_dir.path().join("minimal.html").exists());
        assert!(temp_dir.path().join("SubDirectory/Hooks.html").exists());
    }

    #[test]
    fn test_transforms_glob_into_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "SampleData/good/minimal.ndjson", MINIMAL);
        create_ndjson_file(temp_dir.path(), "SampleData/good/SubDirectory/Hooks.ndjson", HOOKS);
        let out_dir = temp_dir.path().join("out");

        let options = ConvertOptions::new()
            .with_base_dir(Some(temp_dir.path().to_path_buf()))
            .with_output_dir(Some(out_dir.clone()));
        let result = run(options, &["SampleData/good/**/*.ndjson".to_string()]);

        assert_eq!(result.exit_code(), 0);
        assert_eq!(
            html_files(&out_dir),
            vec![out_dir.join("Hooks.html"), out_dir.join("minimal.html")]
        );
        assert!(!temp_dir.path().join("SampleData/good/minimal.html").exists());
    }

    #[test]
    fn test_empty_envelope_fails_only_that_file() {
        let temp_dir = TempDir::new().unwrap();
        let bad = create_ndjson_file(temp_dir.path(), "bad.ndjson", EMPTY_ENVELOPE);
        let good = create_ndjson_file(temp_dir.path(), "good.ndjson", MINIMAL);

        let result = run(ConvertOptions::new(), &[spec(&bad), spec(&good)]);

        assert_eq!(result.exit_code(), -1);
        let lines = messages(&result);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!(
            "An error occurred while processing {}.",
            bad.display()
        )));
        assert!(lines[0].contains("Empty Envelope"));
        assert_eq!(
            lines[1],
            format!("Conversion of {} completed successfully.", good.display())
        );
    }

    #[test]
    fn test_malformed_record_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let bad = create_ndjson_file(temp_dir.path(), "BADDATA.ndjson", "{\"meta\":{}}\nthis is not json\n");

        let result = run(ConvertOptions::new(), &[spec(&bad)]);

        assert_eq!(result.exit_code(), -1);
        assert!(messages(&result)[0].contains("line 2"));
        // 부분 출력은 그대로 남음
        assert!(temp_dir.path().join("BADDATA.html").exists());
    }

    #[test]
    fn test_output_directory_overrides_source_directory() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_ndjson_file(temp_dir.path(), "one/a.ndjson", MINIMAL);
        let second = create_ndjson_file(temp_dir.path(), "two/b.ndjson", HOOKS);
        let out_dir = temp_dir.path().join("site");

        let result = run(
            ConvertOptions::new().with_output_dir(Some(out_dir.clone())),
            &[spec(&first), spec(&second)],
        );

        assert_eq!(result.exit_code(), 0);
        assert_eq!(html_files(&out_dir), vec![out_dir.join("a.html"), out_dir.join("b.html")]);
        assert!(html_files(&temp_dir.path().join("one")).is_empty());
        assert!(html_files(&temp_dir.path().join("two")).is_empty());
    }
}

mod merge_tests {
    use super::*;

    #[test]
    fn test_merge_produces_single_report() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let first = create_ndjson_file(temp_dir.path(), "minimal.ndjson", MINIMAL);
        let second = create_ndjson_file(temp_dir.path(), "Hooks.ndjson", HOOKS);

        let options = ConvertOptions::new()
            .with_merged_name(Some("merged.html".to_string()))
            .with_output_dir(Some(temp_dir.path().to_path_buf()))
            .with_temp_dir(scratch.path().to_path_buf());
        let result = run(options, &[spec(&first), spec(&second)]);

        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.converted().count(), 1);
        assert!(messages(&result)[0].starts_with("Conversion of"));

        let reports = html_files(temp_dir.path());
        assert_eq!(reports, vec![temp_dir.path().join("merged.html")]);

        let html = fs::read_to_string(&reports[0]).unwrap();
        assert!(html.contains("Feature"));
        assert!(html.contains("hook"));

        // 빈 줄 없이 두 파일의 레코드가 모두 렌더링됨
        assert_eq!(result.converted().next().unwrap().messages, 7);
    }

    #[test]
    fn test_merge_artifact_removed_after_run() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let input = create_ndjson_file(temp_dir.path(), "minimal.ndjson", MINIMAL);
        let out_dir = temp_dir.path().join("out");

        let options = ConvertOptions::new()
            .with_merged_name(Some("report".to_string()))
            .with_output_dir(Some(out_dir.clone()))
            .with_temp_dir(scratch.path().to_path_buf());
        let result = run(options, &[spec(&input)]);

        assert_eq!(result.exit_code(), 0);
        assert!(out_dir.join("report.html").exists());
        assert!(!scratch.path().join("report.ndjson").exists());
    }

    #[test]
    fn test_merge_artifact_removed_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let good = create_ndjson_file(temp_dir.path(), "good.ndjson", MINIMAL);
        let bad = create_ndjson_file(temp_dir.path(), "bad.ndjson", EMPTY_ENVELOPE);

        let options = ConvertOptions::new()
            .with_merged_name(Some("report".to_string()))
            .with_output_dir(Some(temp_dir.path().to_path_buf()))
            .with_temp_dir(scratch.path().to_path_buf());
        let result = run(options, &[spec(&good), spec(&bad)]);

        assert_eq!(result.exit_code(), -1);
        assert_eq!(result.failures().count(), 1);
        assert!(!scratch.path().join("report.ndjson").exists());
    }

    #[test]
    fn test_merge_without_output_directory_writes_beside_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let input = create_ndjson_file(temp_dir.path(), "minimal.ndjson", MINIMAL);

        let options = ConvertOptions::new()
            .with_merged_name(Some("combined.html".to_string()))
            .with_temp_dir(scratch.path().to_path_buf());
        let result = run(options, &[spec(&input)]);

        assert_eq!(result.exit_code(), 0);
        assert_eq!(html_files(scratch.path()), vec![scratch.path().join("combined.html")]);
        assert!(html_files(temp_dir.path()).is_empty());
    }
}

mod stats_tests {
    use super::*;

    #[test]
    fn test_statistics_tracking() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_ndjson_file(temp_dir.path(), "good.ndjson", MINIMAL);
        let bad = create_ndjson_file(temp_dir.path(), "bad.ndjson", EMPTY_ENVELOPE);
        let missing = temp_dir.path().join("missing.ndjson");

        let result = run(ConvertOptions::new(), &[spec(&good), spec(&bad), spec(&missing)]);
        let stats = result.stats();

        assert_eq!(stats.total_specs, 3);
        assert_eq!(stats.failed_specs, 1);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.messages, 4);
        assert!(stats.bytes_written > 0);
    }
}

mod error_tests {
    use ndjson2html::ConvertError;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_display() {
        let error = ConvertError::NotFound {
            spec: "notafile.ndjson".to_string(),
        };
        assert_eq!(error.to_string(), "File or Directory: notafile.ndjson not found.");
    }

    #[test]
    fn test_data_format_display() {
        let error = ConvertError::DataFormat {
            file: PathBuf::from("bad.ndjson"),
        };
        let msg = error.to_string();
        assert!(msg.contains("Empty Envelope"));
        assert!(msg.contains("bad.ndjson"));
    }
}

mod cli_tests {
    use super::*;
    use std::process::{Command, Output};

    /// 작업 디렉토리를 지정해 실제 실행 파일 실행
    fn run_binary(cwd: &Path, temp: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ndjson2html"))
            .args(args)
            .current_dir(cwd)
            .env("NO_COLOR", "1")
            .env("TMPDIR", temp)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn stdout_lines(output: &Output) -> Vec<String> {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    /// 머리말 줄 다음 줄 반환
    fn line_after<'a>(lines: &'a [String], header: &str) -> &'a str {
        let index = lines
            .iter()
            .position(|line| line == header)
            .unwrap_or_else(|| panic!("missing line {:?} in {:?}", header, lines));
        lines.get(index + 1).map(String::as_str).unwrap_or("")
    }

    #[test]
    fn test_one_failure_makes_exit_code_nonzero() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "good.ndjson", MINIMAL);
        create_ndjson_file(temp_dir.path(), "bad.ndjson", EMPTY_ENVELOPE);

        let output = run_binary(
            temp_dir.path(),
            scratch.path(),
            &["good.ndjson", "bad.ndjson", "missing.ndjson"],
        );

        assert!(!output.status.success());
        #[cfg(unix)]
        assert_eq!(output.status.code(), Some(255));

        let lines = stdout_lines(&output);
        assert!(lines.contains(&"Conversion of good.ndjson completed successfully.".to_string()));
        assert_eq!(
            line_after(&lines, "An error occurred while processing bad.ndjson."),
            "Empty Envelope or non-Ndjson Json data encountered in bad.ndjson."
        );
        assert_eq!(
            line_after(&lines, "An error occurred while processing missing.ndjson."),
            "File or Directory: missing.ndjson not found."
        );

        // 실패한 파일과 무관하게 성공한 파일은 변환됨
        assert!(temp_dir.path().join("good.html").exists());
    }

    #[test]
    fn test_all_converted_exits_zero() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "run.ndjson", HOOKS);

        let output = run_binary(temp_dir.path(), scratch.path(), &["run.ndjson"]);

        assert!(output.status.success());
        assert_eq!(
            stdout_lines(&output),
            vec!["Conversion of run.ndjson completed successfully.".to_string()]
        );
        let html = fs::read_to_string(temp_dir.path().join("run.html")).unwrap();
        assert!(html.contains("\"hook\""));
    }

    #[test]
    fn test_glob_resolved_against_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "runs/a.ndjson", MINIMAL);
        create_ndjson_file(temp_dir.path(), "runs/b.ndjson", HOOKS);
        create_ndjson_file(temp_dir.path(), "other/c.ndjson", HOOKS);

        let output = run_binary(
            temp_dir.path(),
            scratch.path(),
            &["runs/*.ndjson", "--outputDirectory", "out"],
        );

        assert!(output.status.success());
        let lines = stdout_lines(&output);
        assert_eq!(lines.len(), 2);
        assert!(lines
            .iter()
            .all(|line| line.starts_with("Conversion of") && line.ends_with("completed successfully.")));

        let out_dir = temp_dir.path().join("out");
        assert_eq!(
            html_files(&out_dir),
            vec![out_dir.join("a.html"), out_dir.join("b.html")]
        );
    }

    #[test]
    fn test_merged_file_option() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        create_ndjson_file(temp_dir.path(), "a.ndjson", MINIMAL);
        create_ndjson_file(temp_dir.path(), "b.ndjson", HOOKS);

        let output = run_binary(
            temp_dir.path(),
            scratch.path(),
            &["a.ndjson", "b.ndjson", "--mergedFile", "report", "--outputDirectory", "out"],
        );

        assert!(output.status.success());
        let html = fs::read_to_string(temp_dir.path().join("out").join("report.html")).unwrap();
        assert!(html.contains("Feature: minimal"));
        assert!(html.contains("\"hook\""));

        // 병합 임시 파일은 실행 후 삭제됨
        assert!(!scratch.path().join("report.ndjson").exists());
    }
}
