//! 生成画像の保存

use crate::error::Result;
use headshot_ai_common::{encode, Image};
use std::path::{Path, PathBuf};
use tracing::info;

/// 保存形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveFormat {
    /// 画像ファイルそのまま
    #[default]
    Binary,
    /// Data URIテキスト
    DataUri,
}

/// デフォルトのファイル名（pro-headshot-<unix millis>.<ext>）
pub fn default_file_name(image: &Image, format: SaveFormat) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    match format {
        SaveFormat::Binary => format!("pro-headshot-{}.{}", stamp, image.mime().extension()),
        SaveFormat::DataUri => format!("pro-headshot-{}.txt", stamp),
    }
}

/// 画像を保存して保存先を返す
///
/// `output` がディレクトリ（または未指定）ならデフォルトのファイル名で保存する。
pub fn save_image(image: &Image, output: Option<&Path>, format: SaveFormat) -> Result<PathBuf> {
    let path = match output {
        Some(path) if path.is_dir() => path.join(default_file_name(image, format)),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_file_name(image, format)),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        SaveFormat::Binary => std::fs::write(&path, image.bytes())?,
        SaveFormat::DataUri => std::fs::write(&path, encode(image))?,
    }

    info!(path = %path.display(), bytes = image.len(), "画像を保存");
    Ok(path)
}
