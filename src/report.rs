//! 리포트 포맷 모듈
//!
//! 변환 단계가 사용하는 디코딩/렌더링 인터페이스와 기본 HTML 구현을 정의합니다.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::message::{Envelope, NdjsonReader};

/// 디코딩된 envelope 의 지연 시퀀스
pub type EnvelopeStream<'a> = Box<dyn Iterator<Item = Result<Option<Envelope>>> + 'a>;

/// 입력 스트림을 envelope 으로 바꾸고, envelope 을 문서로 렌더링하는 포맷
///
/// 다른 코덱이나 렌더러로 교체할 수 있도록 변환 단계는 이 트레이트에만 의존합니다.
pub trait ReportFormat {
    /// 바이트 스트림을 envelope 시퀀스로 디코딩
    fn decode<'a>(&self, input: Box<dyn BufRead + 'a>) -> EnvelopeStream<'a>;

    /// envelope 하나를 출력에 기록
    fn render(&self, envelope: &Envelope, sink: &mut dyn Write) -> Result<()>;

    /// 첫 envelope 이전에 한 번 호출
    fn begin(&self, _sink: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    /// 입력이 정상적으로 끝났을 때 한 번 호출
    fn finish(&self, _sink: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    /// 출력 파일 확장자
    fn extension(&self) -> &str {
        "html"
    }
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>"#;

const HTML_BODY: &str = r#"</title>
</head>
<body>
<div id="content"></div>
<script>
window.CUCUMBER_MESSAGES = [
"#;

const HTML_TAIL: &str = r#"];
</script>
</body>
</html>
"#;

/// 모든 메시지를 `<script>` 안의 JSON 배열로 담는 단일 HTML 문서
#[derive(Debug, Clone)]
pub struct HtmlReport {
    title: String,
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self {
            title: "Test Results".to_string(),
        }
    }
}

impl HtmlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서 제목 설정
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl ReportFormat for HtmlReport {
    fn decode<'a>(&self, input: Box<dyn BufRead + 'a>) -> EnvelopeStream<'a> {
        Box::new(NdjsonReader::new(input))
    }

    fn render(&self, envelope: &Envelope, sink: &mut dyn Write) -> Result<()> {
        let json = serde_json::to_string(envelope).map_err(std::io::Error::from)?;
        // 배열 끝의 쉼표는 JavaScript 에서 허용됨
        writeln!(sink, "{},", escape_script(&json))?;
        Ok(())
    }

    fn begin(&self, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(HTML_HEAD.as_bytes())?;
        sink.write_all(escape_html(&self.title).as_bytes())?;
        sink.write_all(HTML_BODY.as_bytes())?;
        Ok(())
    }

    fn finish(&self, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(HTML_TAIL.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

/// `<script>` 안에서 HTML 파서가 태그나 주석으로 읽지 않도록 모든 `<` 를 이스케이프
///
/// 직렬화된 JSON 에서 `<` 는 문자열 안에만 나타나므로 `\u003c` 로 바꿔도 값은 같습니다.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
