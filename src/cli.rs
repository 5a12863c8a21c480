use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "headshot")]
#[command(about = "セルフィーからAIでプロフェッショナルなヘッドショットを生成", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スタイルプリセット一覧を表示
    Styles {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// セルフィーからヘッドショットを生成
    Generate {
        /// セルフィー画像（jpg/png/webp、またはData URIのテキスト）
        #[arg(required = true)]
        selfie: PathBuf,

        /// スタイルID (corporate/tech/outdoor/startup/studio)
        #[arg(short, long, default_value = "corporate")]
        style: String,

        /// 生成後に順番に適用する編集指示（複数指定可）
        #[arg(short, long)]
        edit: Vec<String>,

        /// 出力ファイル/ディレクトリ（デフォルト: pro-headshot-<時刻>.jpg）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data URIテキストとして保存
        #[arg(long)]
        data_uri: bool,
    },

    /// 対話モードでスタイル選択と編集を繰り返す
    Session {
        /// セルフィー画像
        #[arg(required = true)]
        selfie: PathBuf,

        /// 保存先ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
