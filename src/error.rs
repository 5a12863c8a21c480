use crate::workflow::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadshotError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`headshot config --set-api-key YOUR_KEY` で設定するか GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("画像データが不正です: {0}")]
    MalformedPayload(String),

    #[error("画像が生成されませんでした")]
    NoImageProduced,

    #[error("API呼び出しエラー: {0}")]
    TransportFailure(String),

    #[error("対応していない画像形式です: {0}")]
    UnsupportedImage(String),

    #[error("画像サイズが上限を超えています: {size} bytes (上限 {limit} bytes)")]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("スタイルが見つかりません: {0}")]
    UnknownStyle(String),

    #[error("{phase:?} では {event} を受け付けられません")]
    InvalidTransition { phase: Phase, event: &'static str },

    #[error("編集処理が実行中です")]
    EditInFlight,

    #[error("編集指示が空です")]
    EmptyInstruction,

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<headshot_ai_common::Error> for HeadshotError {
    fn from(err: headshot_ai_common::Error) -> Self {
        match err {
            headshot_ai_common::Error::MalformedPayload(msg) => HeadshotError::MalformedPayload(msg),
            headshot_ai_common::Error::UnknownStyle(id) => HeadshotError::UnknownStyle(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeadshotError>;
