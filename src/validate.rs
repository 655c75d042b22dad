//! Input checks run before anything is sent.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use url::Url;

use crate::error::{Error, Result};

const INVALID_BASE64: &str = "Passed string is not a valid base 64 string";

/// Signatures are matched against at most this many decoded bytes.
const SNIFF_LEN: usize = 75;

/// MIME types accepted in an explicit `data:` prefix.
const KNOWN_DATA_MIMES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "image/tiff",
    "image/bmp",
];

/// Accepts absolute URLs that carry both a scheme and a host.
///
/// The input must already be in the form `url` would serialise it to (up to
/// ASCII case and a trailing `/`), so nothing the parser silently repairs
/// gets through.
pub fn validate_url(raw: &str) -> Result<&str> {
    let invalid = || Error::InvalidInput(format!("'{}' is not a valid URL", raw));

    if raw.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err(invalid());
    }

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.host_str(), Some(host) if !host.is_empty()) {
        return Err(invalid());
    }

    let normalized = parsed.as_str();
    let same = normalized.eq_ignore_ascii_case(raw)
        || normalized
            .strip_suffix('/')
            .is_some_and(|trimmed| trimmed.eq_ignore_ascii_case(raw));
    if same {
        Ok(raw)
    } else {
        Err(invalid())
    }
}

pub fn validate_path(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "'{}' is not a valid path or does not exist",
            path.display()
        )))
    }
}

/// Checks `data` and returns it as a `data:<mime>;base64,` URI.
///
/// Without a prefix the MIME type is sniffed from the decoded bytes.
pub fn to_data_uri(data: &str) -> Result<String> {
    if let Some(rest) = data.strip_prefix("data:") {
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| Error::InvalidInput(INVALID_BASE64.to_owned()))?;
        if !KNOWN_DATA_MIMES.contains(&mime) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a supported media type",
                mime
            )));
        }
        decode_strict(payload)?;
        return Ok(data.to_owned());
    }

    let bytes = decode_strict(data)?;
    let mime = sniff_mime(&bytes).ok_or_else(|| {
        Error::InvalidInput(
            "Unable to detect a supported media type from the base64 payload".to_owned(),
        )
    })?;

    Ok(format!("data:{};base64,{}", mime, data))
}

/// Decodes canonical base64 only: standard alphabet, at most two trailing
/// `=` and an exact re-encoding.
pub fn decode_strict(data: &str) -> Result<Vec<u8>> {
    let invalid = || Error::InvalidInput(INVALID_BASE64.to_owned());

    let body = data.trim_end_matches('=');
    if data.len() - body.len() > 2 {
        return Err(invalid());
    }
    if !body
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return Err(invalid());
    }

    let decoded = STANDARD.decode(data).map_err(|_| invalid())?;
    if STANDARD.encode(&decoded) != data {
        return Err(invalid());
    }

    Ok(decoded)
}

/// Identifies a payload from its leading bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    // JPEG: FF D8 FF followed by an APP0, APP1 or SPIFF marker
    if head.len() >= 4 && head[0..3] == [0xFF, 0xD8, 0xFF] && matches!(head[3], 0xE0 | 0xE1 | 0xE8)
    {
        return Some("image/jpeg");
    }
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    // GIF87a / GIF89a
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if head.starts_with(b"%PDF") {
        return Some("application/pdf");
    }
    None
}
