//! Closed value sets used on both sides of the wire.

use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, Error};

/// Recognition language accepted by the `language` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Arabic,
    Bulgarian,
    ChineseSimplified,
    ChineseTraditional,
    Croatian,
    Czech,
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Greek,
    Hungarian,
    Korean,
    Italian,
    Japanese,
    Polish,
    Portuguese,
    Russian,
    Slovenian,
    Spanish,
    Swedish,
    Thai,
    Turkish,
    Ukrainian,
    Vietnamese,
}

impl Language {
    pub const ALL: [Language; 27] = [
        Language::Arabic,
        Language::Bulgarian,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Croatian,
        Language::Czech,
        Language::Danish,
        Language::Dutch,
        Language::English,
        Language::Finnish,
        Language::French,
        Language::German,
        Language::Greek,
        Language::Hungarian,
        Language::Korean,
        Language::Italian,
        Language::Japanese,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::Slovenian,
        Language::Spanish,
        Language::Swedish,
        Language::Thai,
        Language::Turkish,
        Language::Ukrainian,
        Language::Vietnamese,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Arabic => "ara",
            Language::Bulgarian => "bul",
            Language::ChineseSimplified => "chs",
            Language::ChineseTraditional => "cht",
            Language::Croatian => "hrv",
            Language::Czech => "cze",
            Language::Danish => "dan",
            Language::Dutch => "dut",
            Language::English => "eng",
            Language::Finnish => "fin",
            Language::French => "fre",
            Language::German => "ger",
            Language::Greek => "gre",
            Language::Hungarian => "hun",
            Language::Korean => "kor",
            Language::Italian => "ita",
            Language::Japanese => "jpn",
            Language::Polish => "pol",
            Language::Portuguese => "por",
            Language::Russian => "rus",
            Language::Slovenian => "slv",
            Language::Spanish => "spa",
            Language::Swedish => "swe",
            Language::Thai => "tha",
            Language::Turkish => "tur",
            Language::Ukrainian => "ukr",
            Language::Vietnamese => "vnm",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| Error::invalid_enum("language code", s))
    }
}

impl TryFrom<&str> for Language {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Hint for the service when the input's type cannot be derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Gif,
    Png,
    Jpg,
    Tif,
    Bmp,
}

impl FileType {
    pub const ALL: [FileType; 6] = [
        FileType::Pdf,
        FileType::Gif,
        FileType::Png,
        FileType::Jpg,
        FileType::Tif,
        FileType::Bmp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Gif => "GIF",
            FileType::Png => "PNG",
            FileType::Jpg => "JPG",
            FileType::Tif => "TIF",
            FileType::Bmp => "BMP",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == s)
            .ok_or_else(|| Error::invalid_enum("file type", s))
    }
}

impl TryFrom<&str> for FileType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for FileType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whole-request outcome reported as `OCRExitCode`.
///
/// `ValidationError` and `TimeOut` are never sent by the service; the client
/// assigns them when a request fails before a usable response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(into = "i64")]
pub enum OcrExitCode {
    ParsedSuccessfully,
    ParsedPartially,
    ParsedFailure,
    FatalError,
    ValidationError,
    TimeOut,
}

impl OcrExitCode {
    pub fn code(self) -> i64 {
        match self {
            OcrExitCode::ParsedSuccessfully => 1,
            OcrExitCode::ParsedPartially => 2,
            OcrExitCode::ParsedFailure => 3,
            OcrExitCode::FatalError => 4,
            OcrExitCode::ValidationError => 99,
            OcrExitCode::TimeOut => 100,
        }
    }
}

impl TryFrom<i64> for OcrExitCode {
    type Error = DecodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OcrExitCode::ParsedSuccessfully),
            2 => Ok(OcrExitCode::ParsedPartially),
            3 => Ok(OcrExitCode::ParsedFailure),
            4 => Ok(OcrExitCode::FatalError),
            99 => Ok(OcrExitCode::ValidationError),
            100 => Ok(OcrExitCode::TimeOut),
            other => Err(DecodeError::UnknownOcrExitCode(other)),
        }
    }
}

impl From<OcrExitCode> for i64 {
    fn from(value: OcrExitCode) -> Self {
        value.code()
    }
}

impl fmt::Display for OcrExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OcrExitCode::ParsedSuccessfully => "parsed successfully",
            OcrExitCode::ParsedPartially => "parsed partially",
            OcrExitCode::ParsedFailure => "parse failure",
            OcrExitCode::FatalError => "fatal error",
            OcrExitCode::ValidationError => "validation error",
            OcrExitCode::TimeOut => "timed out",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Per-file outcome reported as `FileParseExitCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(into = "i64")]
pub enum FileParseExitCode {
    FileNotFound,
    Success,
    OcrEngineParseError,
    Timeout,
    ValidationError,
    UnknownError,
}

impl FileParseExitCode {
    pub fn code(self) -> i64 {
        match self {
            FileParseExitCode::FileNotFound => 0,
            FileParseExitCode::Success => 1,
            FileParseExitCode::OcrEngineParseError => -10,
            FileParseExitCode::Timeout => -20,
            FileParseExitCode::ValidationError => -30,
            FileParseExitCode::UnknownError => -99,
        }
    }
}

impl TryFrom<i64> for FileParseExitCode {
    type Error = DecodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FileParseExitCode::FileNotFound),
            1 => Ok(FileParseExitCode::Success),
            -10 => Ok(FileParseExitCode::OcrEngineParseError),
            -20 => Ok(FileParseExitCode::Timeout),
            -30 => Ok(FileParseExitCode::ValidationError),
            -99 => Ok(FileParseExitCode::UnknownError),
            other => Err(DecodeError::UnknownFileParseExitCode(other)),
        }
    }
}

impl From<FileParseExitCode> for i64 {
    fn from(value: FileParseExitCode) -> Self {
        value.code()
    }
}

/// Names of the form fields sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestParameter {
    Url,
    File,
    Base64Image,
    Language,
    IsOverlayRequired,
    FileType,
    DetectOrientation,
    IsCreateSearchablePdf,
    IsSearchablePdfHideTextLayer,
    Scale,
    IsTable,
    OcrEngine,
}

impl RequestParameter {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestParameter::Url => "url",
            RequestParameter::File => "file",
            RequestParameter::Base64Image => "base64Image",
            RequestParameter::Language => "language",
            RequestParameter::IsOverlayRequired => "isOverlayRequired",
            RequestParameter::FileType => "filetype",
            RequestParameter::DetectOrientation => "detectOrientation",
            RequestParameter::IsCreateSearchablePdf => "isCreateSearchablePdf",
            RequestParameter::IsSearchablePdfHideTextLayer => "isSearchablePdfHideTextLayer",
            RequestParameter::Scale => "scale",
            RequestParameter::IsTable => "isTable",
            RequestParameter::OcrEngine => "OCREngine",
        }
    }
}

impl fmt::Display for RequestParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
