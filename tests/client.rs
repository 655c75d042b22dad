use std::cell::RefCell;
use std::io::{Cursor, Write};

use base64::{engine::general_purpose::STANDARD, Engine};
use pretty_assertions::assert_eq;
use serde_json::json;

use ocrspace::{
    Client, ClientConfig, DecodeError, Error, FileParseExitCode, FileType, FileUpload, HttpRequest,
    InputSource, Language, OcrExitCode, OptionValue, RawResponse, Transport, TransportError,
    RATE_LIMIT_MESSAGE,
};

/// Replies with a canned result and keeps every request it was given.
#[derive(Debug)]
struct FakeTransport {
    reply: RefCell<Option<Result<RawResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    fn replying(body: impl Into<Vec<u8>>) -> Self {
        Self {
            reply: RefCell::new(Some(Ok(RawResponse {
                status: 200,
                body: body.into(),
            }))),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn failing(err: TransportError) -> Self {
        Self {
            reply: RefCell::new(Some(Err(err))),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.reply
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(TransportError::Other("no reply queued".into())))
    }
}

fn success_body(text: &str) -> Vec<u8> {
    json!({
        "ParsedResults": [{
            "TextOverlay": { "Lines": [], "HasOverlay": false, "Message": "Text overlay is not provided as it is not requested" },
            "TextOrientation": "0",
            "FileParseExitCode": 1,
            "ParsedText": text,
            "ErrorMessage": "",
            "ErrorDetails": ""
        }],
        "OCRExitCode": 1,
        "IsErroredOnProcessing": false,
        "ProcessingTimeInMilliseconds": "343",
        "SearchablePDFURL": "Searchable PDF not generated as it was not requested."
    })
    .to_string()
    .into_bytes()
}

fn client(transport: FakeTransport) -> Client<FakeTransport> {
    Client::with_transport(ClientConfig::new("helloworld"), transport)
}

fn offline_client() -> Client<FakeTransport> {
    client(FakeTransport::replying(success_body("")))
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[test]
fn url_request_is_sent_with_api_key() {
    let mut client = client(FakeTransport::replying(success_body(" OCRSpace \r\n")));
    let response = client
        .url("https://ocr.space/Content/Images/ocrspacelogo2020b.png")
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(response.ocr_exit_code, OcrExitCode::ParsedSuccessfully);
    assert_eq!(response.processing_time_in_milliseconds, 343);
    let result = response.first().unwrap();
    assert_eq!(result.file_parse_exit_code, FileParseExitCode::Success);
    assert_eq!(result.parsed_text, "OCRSpace");

    let request = client.transport().last_request();
    assert_eq!(request.url, "https://api.ocr.space/parse/image");
    assert_eq!(request.method, reqwest::Method::POST);
    assert_eq!(request.headers, vec![("apikey", "helloworld".to_owned())]);
    assert_eq!(
        request.param("url").and_then(OptionValue::as_str),
        Some("https://ocr.space/Content/Images/ocrspacelogo2020b.png")
    );
    assert!(!request.has_attachment());
}

#[test]
fn invalid_url_is_rejected_before_sending() {
    let mut client = offline_client();
    let err = client.url("invalid-url").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(err.to_string(), "'invalid-url' is not a valid URL");
    assert!(client.url("").is_err());
    assert!(client.url(" https://example.com/a.png").is_err());
    assert!(client.url("http:example.com").is_err());
    assert!(client.options().is_empty());
    assert!(client.transport().requests.borrow().is_empty());
}

#[test]
fn file_upload_is_sent_as_attachment() {
    let mut image = tempfile::NamedTempFile::new().unwrap();
    image.write_all(&png_bytes()).unwrap();

    let mut client = client(FakeTransport::replying(success_body("OCRSpace")));
    client.file(image.path()).unwrap();
    let response = client.get().unwrap();
    assert_eq!(response.text(), "OCRSpace");

    let request = client.transport().last_request();
    assert!(request.has_attachment());
    let upload = request.param("file").and_then(OptionValue::as_file).unwrap();
    assert_eq!(upload.path(), image.path());
}

#[test]
fn missing_file_is_rejected() {
    let mut client = offline_client();
    let err = client.file("invalid/path").unwrap_err();
    assert_eq!(
        err.to_string(),
        "'invalid/path' is not a valid path or does not exist"
    );
    assert!(client.input().is_none());
}

#[test]
fn prepared_attachment_skips_existence_check() {
    let mut client = offline_client();
    let upload = FileUpload::new("later/scan.png").mime_type("image/png");
    client.attachment(upload.clone());
    assert_eq!(client.input(), Some(&InputSource::File(upload)));
}

#[test]
fn base64_png_gets_data_prefix() {
    let payload = STANDARD.encode(png_bytes());
    let mut client = offline_client();
    client.base64_image(&payload).unwrap();

    let options = client.options();
    assert_eq!(
        options["base64Image"].as_str().unwrap(),
        format!("data:image/png;base64,{payload}")
    );
}

#[test]
fn base64_signatures_pick_the_mime_type() {
    let cases: [(&[u8], &str); 4] = [
        (&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'], "image/jpeg"),
        (b"GIF89a\x01\x00\x01\x00\x00\x00\x00;", "image/gif"),
        (b"GIF87a\x01\x00\x01\x00\x00\x00\x00;", "image/gif"),
        (b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n", "application/pdf"),
    ];
    for (bytes, mime) in cases {
        let payload = STANDARD.encode(bytes);
        let mut client = offline_client();
        client.base64_image(&payload).unwrap();
        assert_eq!(
            client.options()["base64Image"],
            OptionValue::Text(format!("data:{mime};base64,{payload}"))
        );
    }
}

#[test]
fn invalid_base64_is_rejected() {
    let mut client = offline_client();
    for bad in ["not-a-valid-base64", "/9j/invalid characters", "iVBORw0KGgo==="] {
        let err = client.base64_image(bad).unwrap_err();
        assert_eq!(err.to_string(), "Passed string is not a valid base 64 string");
    }
    // valid base64, but not an image
    assert!(matches!(
        client.base64_image(&STANDARD.encode("hello")),
        Err(Error::InvalidInput(_))
    ));
    assert!(client.input().is_none());
}

#[test]
fn prefixed_base64_is_kept() {
    let uri = format!("data:image/bmp;base64,{}", STANDARD.encode(b"BM6\0\0\0"));
    let mut client = offline_client();
    client.base64_image(&uri).unwrap();
    assert_eq!(client.options()["base64Image"].as_str(), Some(uri.as_str()));
}

#[test]
fn input_sources_replace_each_other() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let payload = STANDARD.encode(png_bytes());
    let mut client = offline_client();

    client.url("https://example.com/a.png").unwrap();
    client.file(file.path()).unwrap();
    let keys: Vec<_> = client.options().into_keys().collect();
    assert_eq!(keys, ["file"]);

    client.base64_image(&payload).unwrap();
    let keys: Vec<_> = client.options().into_keys().collect();
    assert_eq!(keys, ["base64Image"]);

    client.url("https://example.com/b.png").unwrap();
    let options = client.options();
    assert_eq!(options.len(), 1);
    assert_eq!(options["url"].as_str(), Some("https://example.com/b.png"));
}

#[test]
fn failed_validation_keeps_previous_input() {
    let mut client = offline_client();
    client.url("https://example.com/a.png").unwrap();
    assert!(client.base64_image("%%%").is_err());
    assert_eq!(
        client.options()["url"].as_str(),
        Some("https://example.com/a.png")
    );
}

#[test]
fn language_accepts_enum_or_code() {
    let mut client = offline_client();
    client.language(Language::English).unwrap();
    assert_eq!(client.options()["language"].as_str(), Some("eng"));
    client.language("spa").unwrap();
    assert_eq!(client.options()["language"].as_str(), Some("spa"));

    let err = client.language("xx").unwrap_err();
    assert!(matches!(err, Error::InvalidEnum { .. }));
    assert_eq!(client.options()["language"].as_str(), Some("spa"));
}

#[test]
fn file_type_accepts_enum_or_code() {
    let mut client = offline_client();
    client.file_type(FileType::Png).unwrap();
    assert_eq!(client.options()["filetype"].as_str(), Some("PNG"));
    client.file_type("JPG").unwrap();
    assert_eq!(client.options()["filetype"].as_str(), Some("JPG"));
    assert!(matches!(
        client.file_type("WEBP"),
        Err(Error::InvalidEnum { kind: "file type", .. })
    ));
}

#[test]
fn boolean_toggles_set_their_parameters() {
    let mut client = offline_client();
    for value in [true, false] {
        client
            .is_overlay_required(value)
            .detect_orientation(value)
            .is_create_searchable_pdf(value)
            .is_searchable_pdf_hide_text_layer(value)
            .scale(value)
            .is_table(value);

        let options = client.options();
        for name in [
            "isOverlayRequired",
            "detectOrientation",
            "isCreateSearchablePdf",
            "isSearchablePdfHideTextLayer",
            "scale",
            "isTable",
        ] {
            assert_eq!(options[name], OptionValue::Bool(value), "{name}");
        }
    }
}

#[test]
fn options_reflect_chained_calls() {
    let mut client = offline_client();
    client
        .url("https://example.com/image.png")
        .unwrap()
        .language(Language::Arabic)
        .unwrap()
        .is_overlay_required(true)
        .file_type(FileType::Pdf)
        .unwrap()
        .engine(2);

    let options = client.options();
    assert_eq!(options["url"].as_str(), Some("https://example.com/image.png"));
    assert_eq!(options["language"].as_str(), Some("ara"));
    assert_eq!(options["isOverlayRequired"].as_bool(), Some(true));
    assert_eq!(options["filetype"].as_str(), Some("PDF"));
    assert_eq!(options["OCREngine"].as_int(), Some(2));
}

#[test]
fn engine_two_sends_auto_language() {
    let mut client = offline_client();
    client
        .url("https://example.com/image.png")
        .unwrap()
        .is_overlay_required(true)
        .engine(2);
    assert_eq!(client.options()["language"].as_str(), Some("auto"));

    client.get().unwrap();
    let request = client.transport().last_request();
    assert_eq!(
        request.param("language").and_then(OptionValue::as_str),
        Some("auto")
    );
}

#[test]
fn engine_two_keeps_explicit_language() {
    let mut client = offline_client();
    client.language(Language::English).unwrap().engine(2);
    assert_eq!(client.options()["language"].as_str(), Some("eng"));

    let mut client = offline_client();
    client.engine(2).language("eng").unwrap();
    assert_eq!(client.options()["language"].as_str(), Some("eng"));
}

#[test]
fn engine_values_pass_through() {
    let mut client = offline_client();
    for engine in [1, 2, 3] {
        client.engine(engine);
        assert_eq!(client.options()["OCREngine"], OptionValue::Int(engine.into()));
    }
}

#[test]
fn reset_clears_every_parameter() {
    let mut client = offline_client();
    client.url("https://example.com/a.png").unwrap().scale(true).engine(2);
    client.reset();
    assert!(client.options().is_empty());
}

#[test]
fn custom_base_url_and_method_are_used() {
    let config = ClientConfig::new("secret")
        .base_url("http://localhost:9000/")
        .endpoint("/parse/imageurl");
    let mut client = Client::with_transport(config, FakeTransport::replying(success_body("x")));
    client.method(reqwest::Method::GET);
    client.get().unwrap();

    let request = client.transport().last_request();
    assert_eq!(request.url, "http://localhost:9000/parse/imageurl");
    assert_eq!(request.method, reqwest::Method::GET);
    assert_eq!(request.headers[0].1, "secret");
}

#[test]
fn non_json_reply_becomes_fatal_response() {
    let client = client(FakeTransport::replying("Internal Server Error"));
    let response = client.get().unwrap();
    assert_eq!(response.ocr_exit_code, OcrExitCode::FatalError);
    assert!(response.is_errored_on_processing);
    assert_eq!(response.processing_time_in_milliseconds, 0);
    assert_eq!(response.error_message, ["Internal Server Error"]);
    assert!(response.parsed_results.is_empty());
}

#[test]
fn rate_limit_reply_becomes_timeout() {
    let client = client(FakeTransport::replying(RATE_LIMIT_MESSAGE));
    let response = client.get().unwrap();
    assert_eq!(response.ocr_exit_code, OcrExitCode::TimeOut);
    assert!(response.is_errored_on_processing);
}

#[test]
fn transport_timeout_becomes_timeout_response() {
    let client = client(FakeTransport::failing(TransportError::Timeout(
        "operation timed out".into(),
    )));
    let response = client.get().unwrap();
    assert_eq!(response.ocr_exit_code, OcrExitCode::TimeOut);
    assert_eq!(response.processing_time_in_milliseconds, 0);
    assert!(response.is_errored_on_processing);
}

#[test]
fn connection_failure_becomes_fatal_response() {
    let client = client(FakeTransport::failing(TransportError::Connect(
        "connection refused".into(),
    )));
    let response = client.get().unwrap();
    assert_eq!(response.ocr_exit_code, OcrExitCode::FatalError);
    assert_eq!(response.error_message, ["could not connect: connection refused"]);
}

#[test]
fn service_error_reply_is_decoded() {
    let body = json!({
        "OCRExitCode": 99,
        "IsErroredOnProcessing": true,
        "ErrorMessage": ["Parameter name 'language' is invalid"],
        "ProcessingTimeInMilliseconds": "0"
    });
    let client = client(FakeTransport::replying(body.to_string()));
    let response = client.get().unwrap();
    assert_eq!(response.ocr_exit_code, OcrExitCode::ValidationError);
    assert_eq!(
        response.error_message,
        ["Parameter name 'language' is invalid"]
    );
    assert!(response.error_details.is_empty());
}

#[test]
fn unknown_exit_code_is_an_error() {
    let body = json!({ "OCRExitCode": 7, "ParsedResults": [] });
    let client = client(FakeTransport::replying(body.to_string()));
    let err = client.get().unwrap_err();
    assert!(matches!(
        err,
        Error::Decoding(DecodeError::UnknownOcrExitCode(7))
    ));
}

#[test]
fn overlay_words_without_size_decode() {
    let body = json!({
        "OCRExitCode": 1,
        "ParsedResults": [{
            "FileParseExitCode": 1,
            "ParsedText": "OCR Space",
            "TextOverlay": {
                "HasOverlay": true,
                "Message": "",
                "Lines": [{
                    "LineText": "OCR Space",
                    "MaxHeight": 33,
                    "MinTop": 52,
                    "Words": [
                        { "WordText": "OCR", "Left": 27, "Top": 52 },
                        { "WordText": "Space", "Left": 98, "Top": 52, "Height": 33, "Width": 112 }
                    ]
                }]
            }
        }]
    });
    let client = client(FakeTransport::replying(body.to_string()));
    let response = client.get().unwrap();

    let line = &response.first().unwrap().text_overlay.lines[0];
    assert_eq!(line.line_text, "OCR Space");
    assert_eq!(line.max_height, 33.0);
    assert_eq!(line.words[0].height, 0.0);
    assert_eq!(line.words[0].width, 0.0);
    assert_eq!(line.words[1].width, 112.0);
}

#[test]
fn get_snapshots_options_per_call() {
    let mut client = offline_client();
    client.url("https://example.com/a.png").unwrap();
    let first = client.request();
    client.url("https://example.com/b.png").unwrap();

    assert_eq!(
        first.param("url").and_then(OptionValue::as_str),
        Some("https://example.com/a.png")
    );
}
