//! 画像生成クライアント
//!
//! - ImageGenerator: 生成/編集の2操作を持つ抽象（ワークフローはこれだけに依存）
//! - GeminiClient: Gemini generateContent API による実装

mod client;
pub mod types;

pub use client::GeminiClient;

use crate::error::Result;
use headshot_ai_common::Image;
use std::future::Future;

/// 外部画像生成サービス
///
/// どちらの操作も「指示文1つ + インライン画像1枚 → 画像1枚」の形で、
/// 部分結果やストリーミングは扱わない。失敗時の再試行もしない。
pub trait ImageGenerator {
    /// セルフィーにスタイルを適用してヘッドショットを生成
    fn generate(
        &self,
        source: &Image,
        style_modifier: &str,
    ) -> impl Future<Output = Result<Image>> + Send;

    /// 現在の画像に編集指示を適用
    fn edit(&self, source: &Image, instruction: &str) -> impl Future<Output = Result<Image>> + Send;
}
