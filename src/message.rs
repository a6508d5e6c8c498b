//! 메시지 envelope 및 NDJSON 코덱 모듈
//!
//! 한 줄에 하나씩 기록된 JSON 레코드를 `Envelope` 로 디코딩합니다.
//! 메시지 본문은 해석하지 않고 `serde_json::Value` 그대로 보관합니다.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::io::{BufRead, Lines};

use crate::error::{ConvertError, Result};

/// envelope 이 담을 수 있는 메시지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Attachment,
    GherkinDocument,
    Hook,
    Meta,
    ParameterType,
    ParseError,
    Pickle,
    Source,
    StepDefinition,
    TestCase,
    TestCaseFinished,
    TestCaseStarted,
    TestRunFinished,
    TestRunHookFinished,
    TestRunHookStarted,
    TestRunStarted,
    TestStepFinished,
    TestStepStarted,
    UndefinedParameterType,
}

impl MessageKind {
    /// 모든 메시지 종류 (디코딩 시 우선순위 순서)
    pub const ALL: [MessageKind; 19] = [
        MessageKind::Attachment,
        MessageKind::GherkinDocument,
        MessageKind::Hook,
        MessageKind::Meta,
        MessageKind::ParameterType,
        MessageKind::ParseError,
        MessageKind::Pickle,
        MessageKind::Source,
        MessageKind::StepDefinition,
        MessageKind::TestCase,
        MessageKind::TestCaseFinished,
        MessageKind::TestCaseStarted,
        MessageKind::TestRunFinished,
        MessageKind::TestRunHookFinished,
        MessageKind::TestRunHookStarted,
        MessageKind::TestRunStarted,
        MessageKind::TestStepFinished,
        MessageKind::TestStepStarted,
        MessageKind::UndefinedParameterType,
    ];

    /// JSON 객체에서 사용하는 필드 이름
    pub fn field_name(self) -> &'static str {
        match self {
            MessageKind::Attachment => "attachment",
            MessageKind::GherkinDocument => "gherkinDocument",
            MessageKind::Hook => "hook",
            MessageKind::Meta => "meta",
            MessageKind::ParameterType => "parameterType",
            MessageKind::ParseError => "parseError",
            MessageKind::Pickle => "pickle",
            MessageKind::Source => "source",
            MessageKind::StepDefinition => "stepDefinition",
            MessageKind::TestCase => "testCase",
            MessageKind::TestCaseFinished => "testCaseFinished",
            MessageKind::TestCaseStarted => "testCaseStarted",
            MessageKind::TestRunFinished => "testRunFinished",
            MessageKind::TestRunHookFinished => "testRunHookFinished",
            MessageKind::TestRunHookStarted => "testRunHookStarted",
            MessageKind::TestRunStarted => "testRunStarted",
            MessageKind::TestStepFinished => "testStepFinished",
            MessageKind::TestStepStarted => "testStepStarted",
            MessageKind::UndefinedParameterType => "undefinedParameterType",
        }
    }

    /// 필드 이름으로 메시지 종류 찾기
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field_name() == name)
    }
}

/// 디코딩된 레코드 하나
///
/// 알려진 payload 가 하나도 없는 레코드는 `Empty` 가 됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Message(MessageKind, Value),
    Empty,
}

impl Envelope {
    /// 새 envelope 생성
    pub fn new(kind: MessageKind, body: Value) -> Self {
        Envelope::Message(kind, body)
    }

    /// 모든 payload 슬롯이 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        matches!(self, Envelope::Empty)
    }

    /// 메시지 종류 반환 (비어 있으면 None)
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Envelope::Message(kind, _) => Some(*kind),
            Envelope::Empty => None,
        }
    }

    /// JSON 값에서 envelope 생성
    ///
    /// # Returns
    /// - `Ok(None)`: JSON `null`
    /// - `Ok(Some(Envelope::Empty))`: 알려진 필드가 없거나 모두 null 인 객체
    /// - `Err`: 객체가 아닌 값
    pub fn from_value(value: Value) -> std::result::Result<Option<Self>, String> {
        let mut map = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            other => return Err(format!("expected a JSON object, found {}", type_name(&other))),
        };

        // 알 수 없는 필드는 무시
        for kind in MessageKind::ALL {
            match map.remove(kind.field_name()) {
                Some(Value::Null) | None => continue,
                Some(body) => return Ok(Some(Envelope::Message(kind, body))),
            }
        }

        Ok(Some(Envelope::Empty))
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Envelope::Message(kind, body) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(kind.field_name(), body)?;
                map.end()
            }
            Envelope::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 한 줄씩 envelope 을 디코딩하는 지연 반복자
///
/// 공백만 있는 줄은 건너뜁니다. 에러 이후에도 반복을 계속할 수 있지만
/// 변환 단계는 첫 에러에서 중단합니다.
pub struct NdjsonReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for NdjsonReader<R> {
    type Item = Result<Option<Envelope>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ConvertError::Io(e))),
            };
            self.line_no += 1;

            let line = if self.line_no == 1 {
                strip_bom(&line)
            } else {
                &line
            };
            if line.trim().is_empty() {
                continue;
            }

            return Some(parse_line(line, self.line_no));
        }
    }
}

/// 파일 첫 줄 앞의 UTF-8 BOM 제거
pub fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}

/// NDJSON 한 줄 파싱
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Envelope>> {
    let value: Value = serde_json::from_str(line).map_err(|e| ConvertError::Decode {
        line: line_no,
        reason: e.to_string(),
    })?;

    Envelope::from_value(value).map_err(|reason| ConvertError::Decode {
        line: line_no,
        reason,
    })
}
