//! Blocking client for the [OCR.space](https://ocr.space/ocrapi) parse API.
//!
//! ```no_run
//! # fn main() -> ocrspace::Result<()> {
//! let mut client = ocrspace::Client::new("helloworld")?;
//! let response = client
//!     .url("https://ocr.space/Content/Images/ocrspacelogo2020b.png")?
//!     .language("eng")?
//!     .is_overlay_required(true)
//!     .get()?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod apis;
pub mod client;
pub mod config;
pub mod enums;
pub mod error;
pub mod options;
pub mod transport;
pub mod validate;

pub use apis::ocr::{
    ApiResponse, MediaParsingResult, OverlayLine, OverlayWord, TextOverlay, RATE_LIMIT_MESSAGE,
};
pub use client::Client;
pub use config::ClientConfig;
pub use enums::{FileParseExitCode, FileType, Language, OcrExitCode, RequestParameter};
pub use error::{DecodeError, Error, Result};
pub use options::{FileUpload, InputSource, OptionValue};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError};
