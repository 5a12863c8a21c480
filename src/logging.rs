//! ログ初期化
//!
//! RUST_LOG が設定されていればそれを優先し、なければ `--verbose` で
//! debug / warn を切り替える。ユーザー向けの進捗表示は println! で行う。

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_level = if verbose { "headshot_ai=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // テストなどで二重に初期化された場合は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
