//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

/// 처리 통계 구조체
#[derive(Debug)]
pub struct Statistics {
    /// 입력 명세 수
    pub total_specs: usize,
    /// 해석 실패한 입력 명세 수
    pub failed_specs: usize,
    /// 변환 대상 파일 수
    pub total_files: usize,
    /// 변환 성공 수
    pub converted: usize,
    /// 변환 실패 수
    pub failed: usize,
    /// 렌더링된 envelope 수
    pub messages: usize,
    /// 읽은 총 바이트
    pub bytes_read: u64,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 처리 시작 시간
    start_time: Instant,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_specs: 0,
            failed_specs: 0,
            total_files: 0,
            converted: 0,
            failed: 0,
            messages: 0,
            bytes_read: 0,
            bytes_written: 0,
            start_time: Instant::now(),
        }
    }
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 성공률 (변환 대상이 없으면 None)
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_files == 0 {
            None
        } else {
            Some(self.converted as f64 / self.total_files as f64 * 100.0)
        }
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 Summary".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} Inputs:        {}",
            "📂".bright_cyan(),
            self.total_specs
        );
        if self.failed_specs > 0 {
            println!(
                "  {} Unresolved:    {}",
                "❌".bright_red(),
                self.failed_specs.to_string().red()
            );
        }
        println!(
            "  {} Files:         {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} Converted:     {}",
            "✅".bright_green(),
            self.converted.to_string().green()
        );

        if self.failed > 0 {
            println!(
                "  {} Failed:        {}",
                "❌".bright_red(),
                self.failed.to_string().red()
            );
        } else {
            println!("  {} Failed:        {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} Messages:      {}",
            "✉️".bright_white(),
            self.messages
        );
        println!(
            "  {} Read:          {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );
        println!(
            "  {} Written:       {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );

        if let Some(rate) = self.success_rate() {
            println!("  {} Success rate:  {:.1}%", "📈".bright_white(), rate);
        }

        println!(
            "  {} Elapsed:       {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use ndjson2html::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
