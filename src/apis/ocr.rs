//! Typed view of the `/parse/image` response.
//!
//! The body is first read into a [`serde_json::Value`] and then converted
//! field by field, so that absent or oddly typed optional fields fall back to
//! their defaults while the two exit codes are still checked strictly.

use serde_json::{Map, Value};

use crate::enums::{FileParseExitCode, OcrExitCode};
use crate::error::DecodeError;

/// Plain-text body the service returns when the request quota is exhausted.
// Matched verbatim; the service documents no structured form of this reply.
pub const RATE_LIMIT_MESSAGE: &str =
    "You may only perform this action upto maximum 10 number of times within 600 seconds";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ApiResponse {
    #[serde(rename = "ParsedResults")]
    pub parsed_results: Vec<MediaParsingResult>,
    #[serde(rename = "OCRExitCode")]
    pub ocr_exit_code: OcrExitCode,
    #[serde(rename = "IsErroredOnProcessing")]
    pub is_errored_on_processing: bool,
    #[serde(rename = "ProcessingTimeInMilliseconds")]
    pub processing_time_in_milliseconds: u64,
    #[serde(rename = "SearchablePDFURL")]
    pub searchable_pdf_url: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Vec<String>,
    #[serde(rename = "ErrorDetails")]
    pub error_details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MediaParsingResult {
    #[serde(rename = "FileParseExitCode")]
    pub file_parse_exit_code: FileParseExitCode,
    #[serde(rename = "ParsedText")]
    pub parsed_text: String,
    #[serde(rename = "TextOverlay")]
    pub text_overlay: TextOverlay,
    #[serde(rename = "TextOrientation")]
    pub text_orientation: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Vec<String>,
    #[serde(rename = "ErrorDetails")]
    pub error_details: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, serde::Serialize)]
pub struct TextOverlay {
    #[serde(rename = "Lines")]
    pub lines: Vec<OverlayLine>,
    #[serde(rename = "HasOverlay")]
    pub has_overlay: bool,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Default, Debug, Clone, PartialEq, serde::Serialize)]
pub struct OverlayLine {
    #[serde(rename = "LineText")]
    pub line_text: String,
    #[serde(rename = "Words")]
    pub words: Vec<OverlayWord>,
    #[serde(rename = "MaxHeight")]
    pub max_height: f64,
    #[serde(rename = "MinTop")]
    pub min_top: f64,
}

#[derive(Default, Debug, Clone, PartialEq, serde::Serialize)]
pub struct OverlayWord {
    #[serde(rename = "WordText")]
    pub word_text: String,
    #[serde(rename = "Left")]
    pub left: f64,
    #[serde(rename = "Top")]
    pub top: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Width")]
    pub width: f64,
}

impl ApiResponse {
    /// Response assigned by the client when the service gave nothing decodable.
    pub fn fallback(ocr_exit_code: OcrExitCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            parsed_results: Vec::new(),
            ocr_exit_code,
            is_errored_on_processing: true,
            processing_time_in_milliseconds: 0,
            searchable_pdf_url: None,
            error_message: vec![message],
            error_details: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.ocr_exit_code == OcrExitCode::ParsedSuccessfully && !self.is_errored_on_processing
    }

    pub fn first(&self) -> Option<&MediaParsingResult> {
        self.parsed_results.first()
    }

    /// Text of every parsed file, one per line.
    pub fn text(&self) -> String {
        self.parsed_results
            .iter()
            .map(|result| result.parsed_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decodes a raw response body.
///
/// Bodies that are not a JSON object become a fallback response; only an
/// object with a bad exit code is an error.
pub fn decode_body(body: &[u8]) -> Result<ApiResponse, DecodeError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => decode_response(&map),
        Ok(Value::String(text)) => Ok(fallback_for_text(&text)),
        Ok(other) => {
            tracing::warn!("OCR service returned a non-object JSON body");
            Ok(ApiResponse::fallback(OcrExitCode::FatalError, other.to_string()))
        }
        Err(_) => Ok(fallback_for_text(&String::from_utf8_lossy(body))),
    }
}

fn fallback_for_text(text: &str) -> ApiResponse {
    if text.trim() == RATE_LIMIT_MESSAGE {
        tracing::warn!("OCR service rate limit reached");
        return ApiResponse::fallback(OcrExitCode::TimeOut, text.trim());
    }
    tracing::warn!(len = text.len(), "OCR service returned a non-JSON body");
    ApiResponse::fallback(OcrExitCode::FatalError, text)
}

pub fn decode_response(obj: &Map<String, Value>) -> Result<ApiResponse, DecodeError> {
    let code = required_int(obj, "OCRExitCode")?;
    let ocr_exit_code = OcrExitCode::try_from(code)?;

    let parsed_results = array(obj, "ParsedResults")
        .iter()
        .map(decode_media_result)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiResponse {
        parsed_results,
        ocr_exit_code,
        is_errored_on_processing: boolean(obj, "IsErroredOnProcessing"),
        processing_time_in_milliseconds: lenient_int(obj.get("ProcessingTimeInMilliseconds"))
            .and_then(|ms| u64::try_from(ms).ok())
            .unwrap_or(0),
        searchable_pdf_url: optional_string(obj, "SearchablePDFURL"),
        error_message: string_list(obj.get("ErrorMessage")),
        error_details: string_list(obj.get("ErrorDetails")),
    })
}

fn decode_media_result(value: &Value) -> Result<MediaParsingResult, DecodeError> {
    let obj = value.as_object().ok_or(DecodeError::InvalidType {
        field: "ParsedResults",
        expected: "a list of objects",
    })?;

    let code = required_int(obj, "FileParseExitCode")?;
    let file_parse_exit_code = FileParseExitCode::try_from(code)?;

    Ok(MediaParsingResult {
        file_parse_exit_code,
        parsed_text: string(obj, "ParsedText").trim().to_owned(),
        text_overlay: obj
            .get("TextOverlay")
            .and_then(Value::as_object)
            .map(decode_overlay)
            .unwrap_or_default(),
        text_orientation: optional_string(obj, "TextOrientation"),
        error_message: string_list(obj.get("ErrorMessage")),
        error_details: string_list(obj.get("ErrorDetails")),
    })
}

fn decode_overlay(obj: &Map<String, Value>) -> TextOverlay {
    TextOverlay {
        lines: array(obj, "Lines")
            .iter()
            .filter_map(Value::as_object)
            .map(decode_line)
            .collect(),
        has_overlay: boolean(obj, "HasOverlay"),
        message: string(obj, "Message"),
    }
}

fn decode_line(obj: &Map<String, Value>) -> OverlayLine {
    OverlayLine {
        line_text: string(obj, "LineText"),
        words: array(obj, "Words")
            .iter()
            .filter_map(Value::as_object)
            .map(decode_word)
            .collect(),
        max_height: float(obj, "MaxHeight"),
        min_top: float(obj, "MinTop"),
    }
}

fn decode_word(obj: &Map<String, Value>) -> OverlayWord {
    OverlayWord {
        word_text: string(obj, "WordText"),
        left: float(obj, "Left"),
        top: float(obj, "Top"),
        height: float(obj, "Height"),
        width: float(obj, "Width"),
    }
}

fn required_int(obj: &Map<String, Value>, field: &'static str) -> Result<i64, DecodeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        value => lenient_int(value).ok_or(DecodeError::InvalidType {
            field,
            expected: "an integer",
        }),
    }
}

/// Integers, integral floats within `i64` range and numeric strings.
fn lenient_int(value: Option<&Value>) -> Option<i64> {
    // i64::MAX is not representable as f64; 2^63 is the exclusive bound
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (-BOUND..BOUND).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float(obj: &Map<String, Value>, field: &str) -> f64 {
    match obj.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn boolean(obj: &Map<String, Value>, field: &str) -> bool {
    match obj.get(field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn string(obj: &Map<String, Value>, field: &str) -> String {
    optional_string(obj, field).unwrap_or_default()
}

fn optional_string(obj: &Map<String, Value>, field: &str) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn array<'a>(obj: &'a Map<String, Value>, field: &str) -> &'a [Value] {
    obj.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// A string, a list of strings, or nothing, as a list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
