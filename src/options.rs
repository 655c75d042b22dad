//! Recognition parameters accumulated by [`crate::Client`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::enums::{FileType, Language, RequestParameter};

pub const DEFAULT_ENGINE: u8 = 1;

/// Language sent when engine 2 is selected and no language was chosen.
pub const AUTO_LANGUAGE: &str = "auto";

/// A local file sent as a multipart attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    path: PathBuf,
    file_name: Option<String>,
    mime_type: Option<String>,
}

impl FileUpload {
    /// Wraps `path` without checking that it exists.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Explicit name, else the last component of the path.
    pub fn upload_name(&self) -> Option<String> {
        self.file_name.clone().or_else(|| {
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    pub fn upload_mime(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// The single input the service reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    File(FileUpload),
    /// Always a complete `data:<mime>;base64,` URI.
    Base64(String),
}

impl InputSource {
    pub fn parameter(&self) -> RequestParameter {
        match self {
            InputSource::Url(_) => RequestParameter::Url,
            InputSource::File(_) => RequestParameter::File,
            InputSource::Base64(_) => RequestParameter::Base64Image,
        }
    }

    fn to_value(&self) -> OptionValue {
        match self {
            InputSource::Url(url) => OptionValue::Text(url.clone()),
            InputSource::File(upload) => OptionValue::File(upload.clone()),
            InputSource::Base64(uri) => OptionValue::Text(uri.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Bool(bool),
    Int(i64),
    File(FileUpload),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileUpload> {
        match self {
            OptionValue::File(upload) => Some(upload),
            _ => None,
        }
    }

    /// Form-field text, `None` for attachments.
    pub fn form_text(&self) -> Option<String> {
        match self {
            OptionValue::Text(s) => Some(s.clone()),
            OptionValue::Bool(b) => Some(b.to_string()),
            OptionValue::Int(n) => Some(n.to_string()),
            OptionValue::File(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::File(upload) => write!(f, "@{}", upload.path().display()),
            other => f.write_str(&other.form_text().unwrap_or_default()),
        }
    }
}

/// Every parameter that has been set, and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub input: Option<InputSource>,
    pub language: Option<Language>,
    pub is_overlay_required: Option<bool>,
    pub file_type: Option<FileType>,
    pub detect_orientation: Option<bool>,
    pub is_create_searchable_pdf: Option<bool>,
    pub is_searchable_pdf_hide_text_layer: Option<bool>,
    pub scale: Option<bool>,
    pub is_table: Option<bool>,
    pub engine: Option<u8>,
}

impl RequestOptions {
    pub fn engine_or_default(&self) -> u8 {
        self.engine.unwrap_or(DEFAULT_ENGINE)
    }

    /// Flattens the options into `(parameter, value)` pairs in wire-name order.
    pub fn to_params(&self) -> Vec<(RequestParameter, OptionValue)> {
        let mut params = Vec::new();

        if let Some(input) = &self.input {
            params.push((input.parameter(), input.to_value()));
        }

        match (self.language, self.engine) {
            (Some(lang), _) => params.push((
                RequestParameter::Language,
                OptionValue::Text(lang.as_str().to_owned()),
            )),
            (None, Some(2)) => params.push((
                RequestParameter::Language,
                OptionValue::Text(AUTO_LANGUAGE.to_owned()),
            )),
            _ => {}
        }

        let flags = [
            (RequestParameter::IsOverlayRequired, self.is_overlay_required),
            (RequestParameter::DetectOrientation, self.detect_orientation),
            (RequestParameter::IsCreateSearchablePdf, self.is_create_searchable_pdf),
            (
                RequestParameter::IsSearchablePdfHideTextLayer,
                self.is_searchable_pdf_hide_text_layer,
            ),
            (RequestParameter::Scale, self.scale),
            (RequestParameter::IsTable, self.is_table),
        ];
        for (param, flag) in flags {
            if let Some(flag) = flag {
                params.push((param, OptionValue::Bool(flag)));
            }
        }

        if let Some(file_type) = self.file_type {
            params.push((
                RequestParameter::FileType,
                OptionValue::Text(file_type.as_str().to_owned()),
            ));
        }

        if let Some(engine) = self.engine {
            params.push((RequestParameter::OcrEngine, OptionValue::Int(engine.into())));
        }

        params.sort_by_key(|(param, _)| *param);
        params
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, OptionValue> {
        self.to_params()
            .into_iter()
            .map(|(param, value)| (param.as_str(), value))
            .collect()
    }
}
