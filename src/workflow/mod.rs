//! ワークフロー制御
//!
//! 表示層からの4つの操作（アップロード / スタイル選択 / 編集 / リセット）を受け、
//! セッションの遷移と生成クライアントの呼び出しを仲介する。
//! セッションを書き換えるのはここだけで、リクエストは常に1件ずつ処理される。

mod session;

pub use session::{
    Effect, Event, FailedOperation, FailureNotice, ImageView, Phase, WorkflowSession,
    EDIT_FAILED_MESSAGE, GENERATE_FAILED_MESSAGE,
};

use crate::error::{HeadshotError, Result};
use crate::gemini::ImageGenerator;
use headshot_ai_common::{lookup_style, Image, MimeType};
use tracing::{info, warn};

/// セッションと生成クライアントの組
///
/// `select_style` / `request_edit` の Future を完了前に破棄すると、
/// セッションは `Generating` / `Editing` のまま残り、`reset_session` でしか抜けられない。
/// 現在の呼び出し側はどれも最後まで await する。
pub struct Workflow<G> {
    generator: G,
    session: WorkflowSession,
}

impl<G: ImageGenerator> Workflow<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            session: WorkflowSession::new(),
        }
    }

    /// 読み取り専用のセッション
    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// セルフィーを受け取り、スタイル選択待ちへ
    pub fn upload_image(&mut self, bytes: Vec<u8>, mime: MimeType) -> Result<()> {
        self.upload(Image::new(bytes, mime))
    }

    pub fn upload(&mut self, image: Image) -> Result<()> {
        info!(mime = %image.mime(), bytes = image.len(), "画像をアップロード");
        self.session.apply(Event::ImageUploaded(image))?;
        Ok(())
    }

    /// スタイルを選んでヘッドショットを生成
    ///
    /// 生成に失敗した場合はスタイル選択待ちに戻り、エラーを呼び出し元へ返す。
    pub async fn select_style(&mut self, style_id: &str) -> Result<&Image> {
        let style = lookup_style(style_id)?;
        let effect = self.session.apply(Event::StyleChosen(style))?;
        info!(style = style.id, "ヘッドショット生成開始");
        self.run(effect).await?;
        self.current()
    }

    /// 現在の画像に編集指示を適用
    ///
    /// 失敗しても現在の画像は変わらず、指示文は `pending_prompt` に残る。
    pub async fn request_edit(&mut self, instruction: &str) -> Result<&Image> {
        let effect = self
            .session
            .apply(Event::EditRequested(instruction.to_string()))?;
        info!(instruction = instruction.trim(), "画像編集開始");
        self.run(effect).await?;
        self.current()
    }

    /// セッションを破棄して初期状態へ
    ///
    /// 中断されたリクエストで生成中/編集中のまま残ったセッションもここで戻せる。
    pub fn reset_session(&mut self) -> Result<()> {
        if self.session.phase().is_busy() {
            warn!(phase = ?self.session.phase(), "未完了のリクエストを破棄してリセット");
        } else {
            info!("セッションをリセット");
        }
        self.session.apply(Event::Reset)?;
        Ok(())
    }

    fn current(&self) -> Result<&Image> {
        self.session
            .current_image()
            .ok_or(HeadshotError::InvalidTransition {
                phase: self.session.phase(),
                event: "current_image",
            })
    }

    /// 遷移が要求した外部呼び出しを実行し、結果をセッションへ戻す
    async fn run(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::None => Ok(()),

            Effect::Generate {
                source,
                style_modifier,
            } => match self.generator.generate(&source, style_modifier).await {
                Ok(image) => {
                    self.session.apply(Event::GenerateSucceeded(image))?;
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "ヘッドショット生成に失敗");
                    self.session.apply(Event::GenerateFailed(err.to_string()))?;
                    Err(err)
                }
            },

            Effect::Edit {
                source,
                instruction,
            } => match self.generator.edit(&source, &instruction).await {
                Ok(image) => {
                    self.session.apply(Event::EditSucceeded(image))?;
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "画像編集に失敗");
                    self.session.apply(Event::EditFailed(err.to_string()))?;
                    Err(err)
                }
            },
        }
    }
}
