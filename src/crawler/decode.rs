//! Charset detection for fetched bodies
//!
//! Nepali news sites still serve a mix of UTF-8 and legacy encodings, often
//! without a charset in the Content-Type header.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decodes raw bytes to a string: BOM, then Content-Type charset, then chardetng
///
/// Malformed sequences are replaced with U+FFFD, which the text cleaner
/// removes later.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, content_type);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("Body contained malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}
