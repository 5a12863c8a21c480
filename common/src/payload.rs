//! 画像ペイロードのData URI変換
//!
//! "data:image/jpeg;base64,/9j/4AAQ..." 形式（transport string）と
//! `Image` の相互変換、およびヘッダ除去を行う。

use crate::error::{Error, Result};
use crate::image::{Image, MimeType};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;

lazy_static::lazy_static! {
    /// 認識するData URIヘッダ
    static ref DATA_URI_PREFIX: Regex =
        Regex::new(r"^data:(image/(?:png|jpeg|jpg|webp));base64,").unwrap();
}

/// `Image` をData URIに変換
pub fn encode(image: &Image) -> String {
    format!("data:{};base64,{}", image.mime(), BASE64.encode(image.bytes()))
}

/// Data URIを `Image` に変換
///
/// ヘッダが無い、未対応のMIMEタイプ、Base64として不正な場合は
/// `MalformedPayload` を返す。
pub fn decode(transport: &str) -> Result<Image> {
    let caps = DATA_URI_PREFIX
        .captures(transport)
        .ok_or_else(|| Error::MalformedPayload("missing or unsupported data URI prefix".into()))?;
    let mime = MimeType::from_mime(&caps[1])
        .ok_or_else(|| Error::MalformedPayload(format!("unsupported mime type: {}", &caps[1])))?;

    let body = strip_transport_prefix(transport);
    let bytes = BASE64
        .decode(body.trim())
        .map_err(|e| Error::MalformedPayload(format!("invalid base64 body: {}", e)))?;

    Ok(Image::new(bytes, mime))
}

/// Data URIヘッダを除去してBase64本体だけを返す
///
/// ヘッダが無い場合は入力をそのまま返す。ヘッダが重なっていても全て除去するので、
/// 2回適用しても結果は変わらない。
pub fn strip_transport_prefix(transport: &str) -> &str {
    let mut body = transport;
    while let Some(m) = DATA_URI_PREFIX.find(body) {
        body = &body[m.end()..];
    }
    body
}
