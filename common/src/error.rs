//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed image payload: {0}")]
    MalformedPayload(String),

    #[error("unknown style preset: {0}")]
    UnknownStyle(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
