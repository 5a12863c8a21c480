//! プロンプト生成モジュール
//!
//! 生成クライアントに渡す指示文のテンプレート:
//! - build_generate_prompt: スタイル適用（初回生成）用
//! - build_edit_prompt: 自由記述による追加編集用
//! - QUICK_EDITS: 編集画面で提示する定型の編集指示

/// 定型の編集指示
pub const QUICK_EDITS: &[&str] = &[
    "Fix lighting balance",
    "Make background more blurry",
    "Enhance sharpness",
    "Add a warm cinematic filter",
];

/// 生成用プロンプト
///
/// 顔の特徴と本人性は厳密に維持し、服装・背景・ライティングだけを
/// `style_modifier` に合わせて変えるよう指示する。
///
/// # Arguments
/// * `style_modifier` - 選択されたプリセットの `prompt_modifier`
pub fn build_generate_prompt(style_modifier: &str) -> String {
    format!(
        "Transform the following selfie into {style_modifier}. \
         Maintain the facial features and identity of the person in the source image strictly, \
         but change the clothing, background, and lighting to match the description. \
         Ensure high realism and professional photography quality."
    )
}

/// 編集用プロンプト
///
/// # Arguments
/// * `instruction` - ユーザーが入力した編集指示
pub fn build_edit_prompt(instruction: &str) -> String {
    format!(
        "Edit the following image: {instruction}. Maintain the high quality and resolution."
    )
}
