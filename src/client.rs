use std::collections::BTreeMap;
use std::path::Path;

use reqwest::Method;

use crate::apis::ocr::{decode_body, ApiResponse};
use crate::config::ClientConfig;
use crate::enums::{FileType, Language, OcrExitCode};
use crate::error::{Error, Result};
use crate::options::{FileUpload, InputSource, OptionValue, RequestOptions};
use crate::transport::{HttpRequest, ReqwestTransport, Transport, TransportError};
use crate::validate;

/// Builds one OCR request at a time and sends it with [`Client::get`].
///
/// Setters mutate the client in place and return it for chaining; the
/// validated ones return a `Result` so invalid input is rejected before any
/// network call.
#[derive(Debug)]
pub struct Client<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    method: Method,
    options: RequestOptions,
    transport: T,
}

impl Client {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            method: Method::POST,
            options: RequestOptions::default(),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    /// Reads the image from a remote URL.
    pub fn url(&mut self, url: &str) -> Result<&mut Self> {
        let url = validate::validate_url(url)?;
        self.options.input = Some(InputSource::Url(url.to_owned()));
        Ok(self)
    }

    /// Uploads a local file; the path must exist.
    pub fn file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        validate::validate_path(path)?;
        self.options.input = Some(InputSource::File(FileUpload::new(path)));
        Ok(self)
    }

    /// Uploads a prepared attachment as-is.
    pub fn attachment(&mut self, upload: FileUpload) -> &mut Self {
        self.options.input = Some(InputSource::File(upload));
        self
    }

    /// Sends an inline base64 payload, with or without a `data:` prefix.
    pub fn base64_image(&mut self, data: &str) -> Result<&mut Self> {
        let uri = validate::to_data_uri(data)?;
        self.options.input = Some(InputSource::Base64(uri));
        Ok(self)
    }

    pub fn language<L>(&mut self, language: L) -> Result<&mut Self>
    where
        L: TryInto<Language>,
        Error: From<L::Error>,
    {
        self.options.language = Some(language.try_into()?);
        Ok(self)
    }

    pub fn file_type<F>(&mut self, file_type: F) -> Result<&mut Self>
    where
        F: TryInto<FileType>,
        Error: From<F::Error>,
    {
        self.options.file_type = Some(file_type.try_into()?);
        Ok(self)
    }

    pub fn is_overlay_required(&mut self, value: bool) -> &mut Self {
        self.options.is_overlay_required = Some(value);
        self
    }

    pub fn detect_orientation(&mut self, value: bool) -> &mut Self {
        self.options.detect_orientation = Some(value);
        self
    }

    pub fn is_create_searchable_pdf(&mut self, value: bool) -> &mut Self {
        self.options.is_create_searchable_pdf = Some(value);
        self
    }

    pub fn is_searchable_pdf_hide_text_layer(&mut self, value: bool) -> &mut Self {
        self.options.is_searchable_pdf_hide_text_layer = Some(value);
        self
    }

    pub fn scale(&mut self, value: bool) -> &mut Self {
        self.options.scale = Some(value);
        self
    }

    pub fn is_table(&mut self, value: bool) -> &mut Self {
        self.options.is_table = Some(value);
        self
    }

    pub fn engine(&mut self, engine: u8) -> &mut Self {
        self.options.engine = Some(engine);
        self
    }

    pub fn input(&self) -> Option<&InputSource> {
        self.options.input.as_ref()
    }

    /// Current parameters keyed by wire name.
    pub fn options(&self) -> BTreeMap<&'static str, OptionValue> {
        self.options.to_map()
    }

    /// Forgets every parameter set so far.
    pub fn reset(&mut self) -> &mut Self {
        self.options = RequestOptions::default();
        self
    }

    pub fn request(&self) -> HttpRequest {
        HttpRequest {
            url: self.config.target_url(),
            method: self.method.clone(),
            headers: vec![("apikey", self.config.api_key.clone())],
            params: self
                .options
                .to_params()
                .into_iter()
                .map(|(param, value)| (param.as_str(), value))
                .collect(),
        }
    }

    /// Sends the current parameters and decodes the reply.
    ///
    /// Transport failures and undecodable bodies come back as a response with
    /// a client-assigned exit code; only a reply with an unknown exit code
    /// is an `Err`.
    pub fn get(&self) -> Result<ApiResponse> {
        let request = self.request();
        tracing::debug!(
            url = %request.url,
            method = %request.method,
            params = ?request.params.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            "sending OCR request"
        );

        let raw = match self.transport.send(&request) {
            Ok(raw) => raw,
            Err(err) => return Ok(transport_fallback(err)),
        };
        tracing::debug!(status = raw.status, bytes = raw.body.len(), "OCR response received");

        Ok(decode_body(&raw.body)?)
    }
}

fn transport_fallback(err: TransportError) -> ApiResponse {
    tracing::warn!(error = %err, "OCR request failed");
    let code = match &err {
        TransportError::Timeout(_) => OcrExitCode::TimeOut,
        TransportError::Attachment(_) => OcrExitCode::ValidationError,
        TransportError::Connect(_) | TransportError::Other(_) => OcrExitCode::FatalError,
    };
    ApiResponse::fallback(code, err.to_string())
}
