//! 画像ペイロードの型定義
//!
//! - MimeType: 扱える画像形式（jpeg / png / webp）
//! - Image: 生バイト列 + MIMEタイプ。生成後は不変

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 画像のMIMEタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeType {
    Jpeg,
    Png,
    Webp,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Webp => "image/webp",
        }
    }

    /// 保存時の拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            MimeType::Jpeg => "jpg",
            MimeType::Png => "png",
            MimeType::Webp => "webp",
        }
    }

    /// "image/jpeg" 形式の文字列から変換（"image/jpg" も許容）
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MimeType::Jpeg),
            "image/png" => Some(MimeType::Png),
            "image/webp" => Some(MimeType::Webp),
            _ => None,
        }
    }

    /// 拡張子から変換
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MimeType::Jpeg),
            "png" => Some(MimeType::Png),
            "webp" => Some(MimeType::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 不変の画像データ
///
/// 編集のたびに新しい `Image` が作られ、既存の値が書き換えられることはない。
/// バイト列は `Arc` で共有するため clone は安価。
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    bytes: Arc<[u8]>,
    mime: MimeType,
}

impl Image {
    pub fn new(bytes: impl Into<Vec<u8>>, mime: MimeType) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
            mime,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> MimeType {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Image {
    // 生バイトはログに出さない
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
