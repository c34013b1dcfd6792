use clap::Parser;
use showtime_finder::app::bootstrap;
use showtime_finder::utils::logger;
use showtime_finder::{CliConfig, FinderError, GetMoviesArgs, LocalStorage};

#[derive(Debug, Parser)]
#[command(name = "showtime-finder")]
#[command(about = "Look up today's (or any day's) movie showtimes for a Canadian city")]
struct Args {
    /// City to search, e.g. "Montreal"
    #[arg(long)]
    city: String,

    /// Province/state code, e.g. "qc"
    #[arg(long)]
    province: String,

    /// Date in YYYY-MM-DD format; defaults to today
    #[arg(short, long)]
    date: Option<String>,

    #[command(flatten)]
    cli: CliConfig,
}

fn exit_with(e: FinderError) -> ! {
    tracing::error!("❌ Startup failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.cli.verbose);
    tracing::info!("Starting showtime-finder");

    let config = args.cli.resolve().unwrap_or_else(|e| exit_with(e));
    if args.cli.verbose {
        tracing::debug!("Resolved config: {:?}", config.directory);
    }

    let storage = LocalStorage::new(".");
    let tool = bootstrap::build_tool(&config, &storage)
        .await
        .unwrap_or_else(|e| exit_with(e));

    let mut request = GetMoviesArgs::new(args.city, args.province);
    request.show_date = args.date;

    let text = tool.get_movies(&request).await;
    println!("{}", text);

    Ok(())
}
