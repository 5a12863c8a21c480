use clap::Parser;
use headshot_ai::{cli, config, error, export, gemini, interactive, logging, upload, workflow};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use export::SaveFormat;
use gemini::GeminiClient;
use headshot_ai_common::{lookup_style, HEADSHOT_STYLES};
use workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Styles { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(HEADSHOT_STYLES)?);
            } else {
                println!("🎨 スタイル一覧\n");
                for style in HEADSHOT_STYLES {
                    println!("{} {:<10} {}", style.icon.glyph(), style.id, style.display_name);
                    println!("     {}", style.description);
                }
            }
        }

        Commands::Generate { selfie, style, edit, output, data_uri } => {
            println!("📸 headshot-ai - ヘッドショット生成\n");

            // 不正なスタイルはAPIを呼ぶ前に弾く
            let preset = lookup_style(&style)?;
            let client = GeminiClient::from_config(&config)?;
            let mut workflow = Workflow::new(client);

            // 1. 読み込み
            println!("[1/3] セルフィーを読み込み中...");
            let image = upload::load_selfie(&selfie, config.max_image_size)?;
            println!("✔ {} ({} KB)\n", selfie.display(), image.len() / 1024);
            workflow.upload(image)?;

            // 2. 生成
            println!(
                "[2/3] {} {} で生成中... (モデル: {})",
                preset.icon.glyph(),
                preset.display_name,
                workflow.generator().model()
            );
            let pb = interactive::spinner("Creating your headshot...");
            let generated = workflow.select_style(preset.id).await.map(|_| ());
            pb.finish_and_clear();
            if generated.is_err() {
                report_failure(&workflow);
                std::process::exit(1);
            }
            println!("✔ 生成完了\n");

            // 編集は順番に適用。失敗したら直前の結果を保存して止める
            let mut edit_failed = false;
            for (i, instruction) in edit.iter().enumerate() {
                println!("  編集 {}/{}: {}", i + 1, edit.len(), instruction);
                let pb = interactive::spinner("Applying edit...");
                let edited = workflow.request_edit(instruction).await.map(|_| ());
                pb.finish_and_clear();
                if edited.is_err() {
                    report_failure(&workflow);
                    edit_failed = true;
                    break;
                }
                println!("  ✔ 適用しました");
            }

            // 3. 保存
            println!("[3/3] 保存中...");
            let format = if data_uri { SaveFormat::DataUri } else { SaveFormat::Binary };
            if let Some(image) = workflow.session().current_image() {
                let path = export::save_image(image, output.as_deref(), format)?;
                println!("✔ 保存: {}", path.display());
            }

            if edit_failed {
                std::process::exit(1);
            }
            println!("\n✅ 完了");
        }

        Commands::Session { selfie, output } => {
            println!("📸 headshot-ai - 対話モード\n");
            let client = GeminiClient::from_config(&config)?;
            let mut workflow = Workflow::new(client);
            interactive::run_session(&mut workflow, &selfie, config.max_image_size, output.as_deref())
                .await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// 失敗時は汎用メッセージだけを出す（詳細はログ）
fn report_failure<G: gemini::ImageGenerator>(workflow: &Workflow<G>) {
    if let Some(notice) = workflow.session().last_error() {
        eprintln!("❌ {}", notice.user_message());
    }
}
