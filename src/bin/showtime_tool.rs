use clap::Parser;
use showtime_finder::app::{bootstrap, tool};
use showtime_finder::utils::logger;
use showtime_finder::{CliConfig, FinderError, LocalStorage, OutputStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

/// 每行讀入一個 get_movies 參數物件，回寫一行 `{"output": "..."}`
#[derive(Debug, Parser)]
#[command(name = "showtime-tool")]
#[command(about = "Serve get_movies tool calls as JSON lines over stdin/stdout")]
struct Args {
    /// Print the tool definition (JSON Schema) and exit
    #[arg(long)]
    print_definition: bool,

    #[command(flatten)]
    cli: CliConfig,
}

fn exit_with(e: FinderError) -> ! {
    tracing::error!("❌ Startup failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_definition {
        println!("{}", serde_json::to_string_pretty(&tool::tool_definition())?);
        return Ok(());
    }

    logger::init_json_logger(args.cli.verbose);
    tracing::info!("🚀 Starting showtime-tool");

    let mut config = args.cli.resolve().unwrap_or_else(|e| exit_with(e));
    // 即時/聊天介面固定使用表格
    config.output.style = OutputStyle::Table;

    let storage = LocalStorage::new(".");
    let movie_tool = bootstrap::build_tool(&config, &storage)
        .await
        .unwrap_or_else(|e| exit_with(e));

    tracing::info!("✅ Ready for tool calls");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = movie_tool.call_json(&line).await;
        println!("{}", serde_json::json!({ "output": output }));
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
