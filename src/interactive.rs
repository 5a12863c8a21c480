//! 対話式セッション
//!
//! スタイル選択 → 生成 → 編集のループをターミナルで回す。
//! 状態の更新はすべて `Workflow` 経由で行う。

use crate::error::{HeadshotError, Result};
use crate::export::{save_image, SaveFormat};
use crate::gemini::ImageGenerator;
use crate::upload::load_selfie;
use crate::workflow::{FailedOperation, ImageView, Workflow};
use dialoguer::{Input, Select};
use headshot_ai_common::{Image, StylePreset, HEADSHOT_STYLES, QUICK_EDITS};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// 編集画面での操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// 編集指示を送る
    Edit(String),
    /// 生成結果 / 元のセルフィーを切り替え
    ToggleView,
    /// 現在の画像を保存
    Save,
    /// 最初からやり直す
    StartOver,
    /// 終了
    Quit,
}

/// 編集画面の入力を解釈
///
/// 数字はクイック編集の番号。空入力は `None`（再入力）。
pub fn parse_edit_command(input: &str) -> Option<EditAction> {
    let trimmed = input.trim();
    match trimmed {
        "" => None,
        "o" | "O" => Some(EditAction::ToggleView),
        "s" | "S" => Some(EditAction::Save),
        "n" | "N" => Some(EditAction::StartOver),
        "q" | "Q" => Some(EditAction::Quit),
        _ => match trimmed.parse::<usize>() {
            Ok(n) if (1..=QUICK_EDITS.len()).contains(&n) => {
                Some(EditAction::Edit(QUICK_EDITS[n - 1].to_string()))
            }
            _ => Some(EditAction::Edit(trimmed.to_string())),
        },
    }
}

/// スタイル選択肢の表示ラベル
pub fn style_label(style: &StylePreset) -> String {
    format!(
        "{} {} - {}",
        style.icon.glyph(),
        style.display_name,
        style.description
    )
}

fn view_label(view: ImageView) -> &'static str {
    match view {
        ImageView::Current => "生成結果",
        ImageView::Original => "元のセルフィー",
    }
}

/// 生成中のスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn describe(image: &Image) -> String {
    format!("{} / {} KB", image.mime(), image.len() / 1024)
}

/// スタイル選択の結果
enum StyleOutcome {
    Generated,
    Quit,
}

/// 編集ループの結果
enum EditOutcome {
    StartOver,
    Quit,
}

/// 対話式セッションを実行
///
/// # Arguments
/// * `workflow` - 生成クライアントを持つワークフロー（Idle状態）
/// * `selfie` - 最初に読み込むセルフィー
/// * `max_edge` - 正規化時の長辺上限
/// * `output_dir` - 保存先（未指定ならカレントディレクトリ）
pub async fn run_session<G: ImageGenerator>(
    workflow: &mut Workflow<G>,
    selfie: &Path,
    max_edge: u32,
    output_dir: Option<&Path>,
) -> Result<()> {
    let mut selfie_path = selfie.to_path_buf();

    loop {
        let (path, image) = load_until_ok(selfie_path, max_edge, prompt_selfie_path)?;
        selfie_path = path;
        println!("📷 セルフィーを読み込みました: {} ({})", selfie_path.display(), describe(&image));
        workflow.upload(image)?;

        if let StyleOutcome::Quit = choose_style(workflow).await? {
            break;
        }

        match edit_loop(workflow, output_dir).await? {
            EditOutcome::Quit => break,
            EditOutcome::StartOver => {
                workflow.reset_session()?;
                selfie_path = prompt_selfie_path(&selfie_path)?;
            }
        }
    }

    println!("👋 終了します");
    Ok(())
}

/// 生成に成功するまでスタイル選択を繰り返す
async fn choose_style<G: ImageGenerator>(workflow: &mut Workflow<G>) -> Result<StyleOutcome> {
    let mut labels: Vec<String> = HEADSHOT_STYLES.iter().map(style_label).collect();
    labels.push("終了".to_string());

    loop {
        let choice = Select::new()
            .with_prompt("スタイルを選択")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| HeadshotError::CliExecution(e.to_string()))?;

        let Some(style) = HEADSHOT_STYLES.get(choice) else {
            return Ok(StyleOutcome::Quit);
        };

        let pb = spinner("Creating your headshot...");
        let outcome = workflow.select_style(style.id).await.map(|img| describe(img));
        pb.finish_and_clear();

        match outcome {
            Ok(summary) => {
                println!("✅ {} で生成しました ({})\n", style.display_name, summary);
                return Ok(StyleOutcome::Generated);
            }
            Err(err) => {
                debug!(error = %err, "生成失敗、スタイル選択へ戻る");
                print_failure(workflow);
            }
        }
    }
}

async fn edit_loop<G: ImageGenerator>(
    workflow: &mut Workflow<G>,
    output_dir: Option<&Path>,
) -> Result<EditOutcome> {
    let mut view = ImageView::Current;

    println!("クイック編集:");
    for (i, edit) in QUICK_EDITS.iter().enumerate() {
        println!("  [{}] {}", i + 1, edit);
    }
    println!("---");
    println!("操作: 編集指示を入力 / [番号]クイック編集 [o]元画像と比較 [s]保存 [n]やり直し [q]終了");
    println!("---\n");

    loop {
        // 失敗した編集指示は入力欄に残す
        let initial = match workflow.session().last_error() {
            Some(notice) if notice.operation == FailedOperation::Edit => {
                workflow.session().pending_prompt().unwrap_or_default().to_string()
            }
            _ => String::new(),
        };

        let input: String = Input::new()
            .with_prompt(format!("[{}] 編集", view_label(view)))
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| HeadshotError::CliExecution(e.to_string()))?;

        let Some(action) = parse_edit_command(&input) else {
            continue;
        };

        match action {
            EditAction::Edit(instruction) => {
                let pb = spinner("Applying edit...");
                let outcome = workflow.request_edit(&instruction).await.map(|img| describe(img));
                pb.finish_and_clear();

                match outcome {
                    Ok(summary) => {
                        view = ImageView::Current;
                        println!("  ✔ {} ({})\n", instruction, summary);
                    }
                    Err(HeadshotError::EmptyInstruction) => continue,
                    Err(err) => {
                        debug!(error = %err, "編集失敗");
                        print_failure(workflow);
                    }
                }
            }
            EditAction::ToggleView => {
                view = match view {
                    ImageView::Current => ImageView::Original,
                    ImageView::Original => ImageView::Current,
                };
                if let Some(image) = workflow.session().displayed(view) {
                    println!("  → {} を表示中 ({})\n", view_label(view), describe(image));
                }
            }
            EditAction::Save => {
                if let Some(image) = workflow.session().current_image() {
                    match try_save(image, output_dir)? {
                        Some(path) => println!("  💾 保存しました: {}\n", path.display()),
                        None => println!("  画像は保持しています。[s] で再試行できます\n"),
                    }
                }
            }
            EditAction::StartOver => return Ok(EditOutcome::StartOver),
            EditAction::Quit => return Ok(EditOutcome::Quit),
        }
    }
}

/// 入力や環境が原因で、やり直せば回復できるエラーか
pub fn is_recoverable(err: &HeadshotError) -> bool {
    matches!(
        err,
        HeadshotError::Io(_)
            | HeadshotError::UnsupportedImage(_)
            | HeadshotError::UploadTooLarge { .. }
            | HeadshotError::ImageLoad(_)
            | HeadshotError::MalformedPayload(_)
    )
}

/// 読み込めるまでパスを聞き直す
///
/// 回復できないエラー（プロンプト自体の失敗など）はそのまま返す。
pub fn load_until_ok<F>(mut path: PathBuf, max_edge: u32, mut ask_path: F) -> Result<(PathBuf, Image)>
where
    F: FnMut(&Path) -> Result<PathBuf>,
{
    loop {
        match load_selfie(&path, max_edge) {
            Ok(image) => return Ok((path, image)),
            Err(err) if is_recoverable(&err) => {
                println!("  ❌ {}", err);
                path = ask_path(&path)?;
            }
            Err(err) => return Err(err),
        }
    }
}

/// 保存を試み、回復できる失敗なら `None` を返してセッションを続ける
pub fn try_save(image: &Image, output_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    match save_image(image, output_dir, SaveFormat::Binary) {
        Ok(path) => Ok(Some(path)),
        Err(err) if is_recoverable(&err) => {
            warn!(error = %err, "保存に失敗");
            println!("  ❌ {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn print_failure<G>(workflow: &Workflow<G>)
where
    G: ImageGenerator,
{
    if let Some(notice) = workflow.session().last_error() {
        println!("  ❌ {}\n", notice.user_message());
    }
}

fn prompt_selfie_path(previous: &Path) -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("新しいセルフィーのパス")
        .with_initial_text(previous.display().to_string())
        .interact_text()
        .map_err(|e| HeadshotError::CliExecution(e.to_string()))?;
    Ok(PathBuf::from(input.trim()))
}
