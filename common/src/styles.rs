//! ヘッドショットのスタイルプリセット
//!
//! 起動時に固定される5種類のプリセット。生成リクエストには
//! `prompt_modifier` がそのまま埋め込まれる。

use crate::error::{Error, Result};
use serde::Serialize;

/// プリセットのアイコン
///
/// 描画側は `glyph()` を使う。文字列での分岐はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleIcon {
    Briefcase,
    Zap,
    Sun,
    Coffee,
    Camera,
}

impl StyleIcon {
    /// ターミナル表示用のグリフ
    pub fn glyph(&self) -> &'static str {
        match self {
            StyleIcon::Briefcase => "💼",
            StyleIcon::Zap => "⚡",
            StyleIcon::Sun => "☀️",
            StyleIcon::Coffee => "☕",
            StyleIcon::Camera => "📷",
        }
    }
}

/// スタイルプリセット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// 生成指示に埋め込む自由記述
    pub prompt_modifier: &'static str,
    pub icon: StyleIcon,
    /// アクセントカラー（16進）
    pub accent_color: &'static str,
}

/// プリセット一覧（表示順）
pub static HEADSHOT_STYLES: &[StylePreset] = &[
    StylePreset {
        id: "corporate",
        display_name: "Corporate Professional",
        description: "Clean grey or navy background, suit or blazer, perfect for LinkedIn.",
        prompt_modifier: "a professional corporate headshot, wearing a tailored business suit, neutral studio grey background, soft studio lighting, high quality, 8k, photorealistic",
        icon: StyleIcon::Briefcase,
        accent_color: "#2563eb",
    },
    StylePreset {
        id: "tech",
        display_name: "Modern Tech Office",
        description: "Smart casual attire, blurred modern office background with glass and wood.",
        prompt_modifier: "a modern tech industry headshot, wearing smart casual business attire, blurred modern open-plan office background, bright natural lighting, 8k, photorealistic",
        icon: StyleIcon::Zap,
        accent_color: "#4f46e5",
    },
    StylePreset {
        id: "outdoor",
        display_name: "Outdoor Natural",
        description: "Warm natural light, bokeh park or city background, approachable vibe.",
        prompt_modifier: "an outdoor lifestyle professional headshot, golden hour natural lighting, blurred city park background with bokeh, friendly and approachable expression, high resolution",
        icon: StyleIcon::Sun,
        accent_color: "#d97706",
    },
    StylePreset {
        id: "startup",
        display_name: "Creative Startup",
        description: "Trendy loft background, brick walls, relaxed but professional.",
        prompt_modifier: "a creative startup founder headshot, trendy loft office background with brick walls, relaxed professional attire, artistic lighting, sharp focus",
        icon: StyleIcon::Coffee,
        accent_color: "#e11d48",
    },
    StylePreset {
        id: "studio",
        display_name: "Classic Studio",
        description: "Dramatic lighting, black or dark textured background, high contrast.",
        prompt_modifier: "a dramatic studio headshot, dark textured background, rembrandt lighting, high contrast, serious and professional demeanor, 8k uhd",
        icon: StyleIcon::Camera,
        accent_color: "#334155",
    },
];

/// IDでプリセットを検索（大文字小文字は区別しない）
pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    let id = id.trim();
    HEADSHOT_STYLES
        .iter()
        .find(|style| style.id.eq_ignore_ascii_case(id))
}

/// IDでプリセットを検索し、見つからなければ `UnknownStyle`
pub fn lookup_style(id: &str) -> Result<&'static StylePreset> {
    find_style(id).ok_or_else(|| Error::UnknownStyle(id.to_string()))
}
