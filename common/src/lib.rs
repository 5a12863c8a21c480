//! Headshot AI Common Library
//!
//! CLIと生成クライアントで共有される型とユーティリティ

pub mod error;
pub mod image;
pub mod payload;
pub mod prompts;
pub mod styles;

pub use error::{Error, Result};
pub use image::{Image, MimeType};
pub use payload::{decode, encode, strip_transport_prefix};
pub use prompts::{build_edit_prompt, build_generate_prompt, QUICK_EDITS};
pub use styles::{find_style, lookup_style, StyleIcon, StylePreset, HEADSHOT_STYLES};
