//! Gemini API連携
//!
//! generate / edit は指示文テンプレートが違うだけで、
//! リクエスト構築とレスポンス抽出は共通。

use super::types::{Content, GeminiRequest, GeminiResponse, GenerationConfig, InlineData, Part};
use super::ImageGenerator;
use crate::config::Config;
use crate::error::{HeadshotError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use headshot_ai_common::{build_edit_prompt, build_generate_prompt, Image, MimeType};
use std::time::Duration;
use tracing::{debug, error, info};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| HeadshotError::TransportFailure(format!("HTTPクライアント初期化エラー: {}", e.without_url())))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// 設定（環境変数含む）からAPIキーを解決して生成
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Self::new(api_key, config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// HTTPリクエストを組み立てる
    ///
    /// APIキーはURLに載せず `x-goog-api-key` ヘッダーで送る。
    fn build_http_request(&self, body: &GeminiRequest) -> Result<reqwest::Request> {
        self.http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
            .build()
            .map_err(transport_failure)
    }

    /// 指示文 + インライン画像のリクエストを送り、画像を1枚取り出す
    async fn request_image(&self, operation: &'static str, instruction: String, source: &Image) -> Result<Image> {
        let request = self.build_http_request(&build_request(instruction, source))?;

        info!(operation, model = %self.model, bytes = source.len(), "Gemini API呼び出し");

        let response = self.http.execute(request).await.map_err(|e| {
            let err = transport_failure(e);
            error!(operation, error = %err, "Gemini API呼び出し失敗");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(operation, %status, body = %body, "Gemini APIエラー応答");
            return Err(HeadshotError::TransportFailure(format!("API error: {}", status)));
        }

        let payload: GeminiResponse = response.json().await.map_err(|e| {
            let err = transport_failure(e);
            error!(operation, error = %err, "Gemini APIレスポンスの解析失敗");
            err
        })?;

        let image = extract_image(&payload)?;
        debug!(operation, mime = %image.mime(), bytes = image.len(), "画像を受信");
        Ok(image)
    }
}

/// reqwestのエラーをURL抜きで変換
fn transport_failure(e: reqwest::Error) -> HeadshotError {
    HeadshotError::TransportFailure(e.without_url().to_string())
}

impl ImageGenerator for GeminiClient {
    async fn generate(&self, source: &Image, style_modifier: &str) -> Result<Image> {
        self.request_image("generate", build_generate_prompt(style_modifier), source)
            .await
    }

    async fn edit(&self, source: &Image, instruction: &str) -> Result<Image> {
        self.request_image("edit", build_edit_prompt(instruction), source)
            .await
    }
}

/// 指示文1つ + インライン画像1枚のリクエストを構築
pub(crate) fn build_request(instruction: String, source: &Image) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: instruction },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: source.mime().as_str().to_string(),
                        data: BASE64.encode(source.bytes()),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig::default(),
    }
}

/// レスポンスから最初のインライン画像を取り出す
///
/// 返ってきたMIMEタイプが認識できればそれを使い、できない場合だけJPEGとして扱う。
/// 元のWeb版は常にJPEGのData URIに包み直していたが、PNG/WebPの応答を
/// JPEGと偽らないよう意図的に変えている。
pub(crate) fn extract_image(response: &GeminiResponse) -> Result<Image> {
    let Some(inline) = response.first_inline_image() else {
        error!(hint = %response.failure_hint(), "レスポンスに画像が含まれていません");
        return Err(HeadshotError::NoImageProduced);
    };

    let bytes = BASE64.decode(inline.data.trim()).map_err(|e| {
        error!(error = %e, "インライン画像のBase64デコード失敗");
        HeadshotError::NoImageProduced
    })?;
    if bytes.is_empty() {
        return Err(HeadshotError::NoImageProduced);
    }

    let mime = MimeType::from_mime(&inline.mime_type).unwrap_or(MimeType::Jpeg);
    Ok(Image::new(bytes, mime))
}
