use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::Method;
use thiserror::Error;

use crate::error::Result;
use crate::options::{FileUpload, OptionValue};

/// Everything needed to perform one call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(&'static str, String)>,
    pub params: Vec<(&'static str, OptionValue)>,
}

impl HttpRequest {
    pub fn has_attachment(&self) -> bool {
        self.params
            .iter()
            .any(|(_, value)| matches!(value, OptionValue::File(_)))
    }

    pub fn param(&self, name: &str) -> Option<&OptionValue> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("could not read attachment: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout(value.to_string())
        } else if value.is_connect() {
            Self::Connect(value.to_string())
        } else {
            Self::Other(value.to_string())
        }
    }
}

/// Sends a prepared request and hands back the raw reply.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError> {
        (**self).send(request)
    }
}

/// [`Transport`] over a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn multipart(params: &[(&'static str, OptionValue)]) -> std::io::Result<Form> {
        let mut form = Form::new();
        for (name, value) in params {
            form = match value {
                OptionValue::File(upload) => form.part(*name, Self::file_part(upload)?),
                other => form.text(*name, other.form_text().unwrap_or_default()),
            };
        }
        Ok(form)
    }

    fn file_part(upload: &FileUpload) -> std::io::Result<Part> {
        let mut part = Part::file(upload.path())?;
        if let Some(name) = upload.upload_name() {
            part = part.file_name(name);
        }
        if let Some(mime) = upload.upload_mime() {
            part = part
                .mime_str(mime)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        }
        Ok(part)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        builder = if request.has_attachment() {
            builder.multipart(Self::multipart(&request.params)?)
        } else {
            let fields: Vec<(&str, String)> = request
                .params
                .iter()
                .filter_map(|(name, value)| value.form_text().map(|text| (*name, text)))
                .collect();
            builder.form(&fields)
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(RawResponse { status, body })
    }
}
