//! セルフィーの読み込み
//!
//! ファイルを検証し、長辺を制限したJPEGに正規化してから `Image` にする。
//! 生成リクエストは常にJPEGとして送られる。

use crate::error::{HeadshotError, Result};
use headshot_ai_common::{decode, Image, MimeType};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

/// アップロード上限 (5MB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const JPEG_QUALITY: u8 = 90;

/// Data URIを保存したテキストファイルの拡張子
const DATA_URI_EXTENSIONS: &[&str] = &["txt", "datauri"];

/// セルフィーを読み込んで正規化
///
/// # Arguments
/// * `path` - 画像ファイル（jpg/png/webp）、またはData URIを書いたテキストファイル
/// * `max_edge` - 長辺の上限(px)
pub fn load_selfie(path: &Path, max_edge: u32) -> Result<Image> {
    if !path.exists() {
        return Err(HeadshotError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("ファイルが見つかりません: {}", path.display()),
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(HeadshotError::UploadTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let raw = if DATA_URI_EXTENSIONS.contains(&ext.as_str()) {
        let content = std::fs::read_to_string(path)?;
        decode(content.trim())?
    } else {
        let mime = MimeType::from_extension(&ext)
            .ok_or_else(|| HeadshotError::UnsupportedImage(path.display().to_string()))?;
        Image::new(std::fs::read(path)?, mime)
    };

    normalize(&raw, max_edge)
}

/// 画像をデコードし、長辺を `max_edge` 以下に縮小してJPEGで再エンコード
pub fn normalize(image: &Image, max_edge: u32) -> Result<Image> {
    let format = match image.mime() {
        MimeType::Jpeg => ImageFormat::Jpeg,
        MimeType::Png => ImageFormat::Png,
        MimeType::Webp => ImageFormat::WebP,
    };

    let decoded = image::load_from_memory_with_format(image.bytes(), format)
        .map_err(|e| HeadshotError::ImageLoad(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    let resized = if max_edge > 0 && width.max(height) > max_edge {
        decoded.thumbnail(max_edge, max_edge)
    } else {
        decoded
    };

    debug!(
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", resized.width(), resized.height()),
        "セルフィーを正規化"
    );

    encode_jpeg(&resized)
}

fn encode_jpeg(image: &DynamicImage) -> Result<Image> {
    // JPEGはアルファを持てない
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| HeadshotError::ImageLoad(e.to_string()))?;
    Ok(Image::new(buffer, MimeType::Jpeg))
}
