//! Charset detection and decoding for fetched problem pages.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

use crate::fetcher::errors::FetchError;

/// How much of the body is scanned for `<meta>` declarations.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// `<meta charset=..>` first, then `<meta http-equiv="content-type" content="..; charset=..">`.
static META_CHARSETS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap(),
        Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap(),
    ]
});

fn label_to_encoding(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_ascii_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Content-Type header, then in-document declarations, then a statistical
/// guess over the first bytes.
pub fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_to_encoding(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let window = &body[..body.len().min(SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    if let Some(encoding) = META_CHARSETS
        .iter()
        .find_map(|pattern| label_to_encoding(pattern, &head))
    {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, body.len() <= SNIFF_WINDOW);
    detector.guess(None, true)
}

pub fn decode(body: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    let (decoded, actual, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            actual.name()
        )));
    }
    Ok(decoded.into_owned())
}

/// Decode with whatever [`detect_encoding`] picks, UTF-8 when unsure.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<(String, &'static Encoding), FetchError> {
    let encoding = detect_encoding(content_type, body);
    let text = decode(body, encoding).or_else(|err| {
        if encoding == UTF_8 {
            Err(err)
        } else {
            decode(body, UTF_8)
        }
    })?;
    Ok((text, encoding))
}
