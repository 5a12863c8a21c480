//! ワークフローのセッション状態と遷移
//!
//! `WorkflowSession` は1回の操作（アップロード → スタイル選択 → 生成 → 編集）の
//! 可変状態を持ち、`apply` でのみ更新される。外部サービスの呼び出しは行わず、
//! 必要な呼び出しを `Effect` として返す。

use crate::error::{HeadshotError, Result};
use headshot_ai_common::{Image, StylePreset};
use tracing::debug;

pub const GENERATE_FAILED_MESSAGE: &str =
    "Failed to generate headshot. Please try again or use a clearer selfie.";
pub const EDIT_FAILED_MESSAGE: &str = "Failed to edit image. Please try again.";

/// セッションのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingStyle,
    Generating,
    Ready,
    Editing,
}

impl Phase {
    /// 生成/編集リクエストが未完了か
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Generating | Phase::Editing)
    }
}

/// 遷移イベント
#[derive(Debug, Clone)]
pub enum Event {
    ImageUploaded(Image),
    StyleChosen(&'static StylePreset),
    GenerateSucceeded(Image),
    GenerateFailed(String),
    EditRequested(String),
    EditSucceeded(Image),
    EditFailed(String),
    Reset,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ImageUploaded(_) => "ImageUploaded",
            Event::StyleChosen(_) => "StyleChosen",
            Event::GenerateSucceeded(_) => "GenerateSucceeded",
            Event::GenerateFailed(_) => "GenerateFailed",
            Event::EditRequested(_) => "EditRequested",
            Event::EditSucceeded(_) => "EditSucceeded",
            Event::EditFailed(_) => "EditFailed",
            Event::Reset => "Reset",
        }
    }
}

/// 遷移の結果として実行すべき外部呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Generate {
        source: Image,
        style_modifier: &'static str,
    },
    Edit {
        source: Image,
        instruction: String,
    },
}

/// どの操作が失敗したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedOperation {
    Generate,
    Edit,
}

/// 直近の失敗
///
/// ユーザーには汎用メッセージだけを見せ、詳細はログ用に保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub operation: FailedOperation,
    pub detail: String,
}

impl FailureNotice {
    pub fn user_message(&self) -> &'static str {
        match self.operation {
            FailedOperation::Generate => GENERATE_FAILED_MESSAGE,
            FailedOperation::Edit => EDIT_FAILED_MESSAGE,
        }
    }
}

/// 表示対象（結果 / 元のセルフィー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageView {
    #[default]
    Current,
    Original,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowSession {
    phase: Phase,
    original_image: Option<Image>,
    current_image: Option<Image>,
    selected_style: Option<&'static StylePreset>,
    last_error: Option<FailureNotice>,
    pending_prompt: Option<String>,
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn original_image(&self) -> Option<&Image> {
        self.original_image.as_ref()
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.current_image.as_ref()
    }

    pub fn selected_style(&self) -> Option<&'static StylePreset> {
        self.selected_style
    }

    pub fn last_error(&self) -> Option<&FailureNotice> {
        self.last_error.as_ref()
    }

    /// 実行中、または直近に失敗した編集指示
    pub fn pending_prompt(&self) -> Option<&str> {
        self.pending_prompt.as_deref()
    }

    /// 比較表示用
    pub fn displayed(&self, view: ImageView) -> Option<&Image> {
        match view {
            ImageView::Current => self.current_image(),
            ImageView::Original => self.original_image(),
        }
    }

    /// イベントを適用して次の状態へ遷移する
    ///
    /// 受け付けられないイベントはエラーを返し、状態は変更しない。
    pub fn apply(&mut self, event: Event) -> Result<Effect> {
        let from = self.phase;
        let name = event.name();

        let effect = match (self.phase, event) {
            (_, Event::Reset) => {
                *self = Self::default();
                Effect::None
            }

            (Phase::Idle, Event::ImageUploaded(image)) => {
                self.original_image = Some(image.clone());
                self.current_image = Some(image);
                self.last_error = None;
                self.phase = Phase::AwaitingStyle;
                Effect::None
            }

            (Phase::AwaitingStyle, Event::StyleChosen(style)) => {
                let Some(source) = self.original_image.clone() else {
                    return Err(self.rejected(name));
                };
                self.selected_style = Some(style);
                self.last_error = None;
                self.phase = Phase::Generating;
                Effect::Generate {
                    source,
                    style_modifier: style.prompt_modifier,
                }
            }

            (Phase::Generating, Event::GenerateSucceeded(image)) => {
                self.current_image = Some(image);
                self.phase = Phase::Ready;
                Effect::None
            }

            (Phase::Generating, Event::GenerateFailed(detail)) => {
                self.last_error = Some(FailureNotice {
                    operation: FailedOperation::Generate,
                    detail,
                });
                self.phase = Phase::AwaitingStyle;
                Effect::None
            }

            (Phase::Ready, Event::EditRequested(text)) => {
                let instruction = text.trim();
                if instruction.is_empty() {
                    return Err(HeadshotError::EmptyInstruction);
                }
                let Some(source) = self.current_image.clone() else {
                    return Err(self.rejected(name));
                };
                self.pending_prompt = Some(instruction.to_string());
                self.last_error = None;
                self.phase = Phase::Editing;
                Effect::Edit {
                    source,
                    instruction: instruction.to_string(),
                }
            }

            (Phase::Editing, Event::EditRequested(_)) => {
                return Err(HeadshotError::EditInFlight);
            }

            (Phase::Editing, Event::EditSucceeded(image)) => {
                self.current_image = Some(image);
                self.pending_prompt = None;
                self.phase = Phase::Ready;
                Effect::None
            }

            (Phase::Editing, Event::EditFailed(detail)) => {
                // current_image と pending_prompt はそのまま残す
                self.last_error = Some(FailureNotice {
                    operation: FailedOperation::Edit,
                    detail,
                });
                self.phase = Phase::Ready;
                Effect::None
            }

            _ => return Err(self.rejected(name)),
        };

        debug!(from = ?from, to = ?self.phase, event = name, "状態遷移");
        debug_assert!(self.invariants_hold(), "invariant violated after {}", name);
        Ok(effect)
    }

    fn rejected(&self, event: &'static str) -> HeadshotError {
        HeadshotError::InvalidTransition {
            phase: self.phase,
            event,
        }
    }

    /// フェーズとフィールドの整合性
    pub fn invariants_hold(&self) -> bool {
        let current_ok = !matches!(self.phase, Phase::Ready | Phase::Editing)
            || self.current_image.is_some();
        let original_ok = self.phase == Phase::Idle || self.original_image.is_some();
        let style_ok = matches!(self.phase, Phase::Idle | Phase::AwaitingStyle)
            || self.selected_style.is_some();
        let idle_ok = self.phase != Phase::Idle
            || (self.original_image.is_none()
                && self.current_image.is_none()
                && self.selected_style.is_none()
                && self.last_error.is_none()
                && self.pending_prompt.is_none());

        current_ok && original_ok && style_ok && idle_ok
    }
}
