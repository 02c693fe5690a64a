use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "actionlog-backend")]
#[command(about = "Game server action log backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Also write daily-rotated log files into this directory
    #[arg(long, env = "ACTIONLOG_LOG_DIR")]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = args.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "actionlog-backend.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer),
            guard,
        )
    });
    let (file_layer, _file_guard) = match file_layer {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    if let Some(config) = args.config {
        std::env::set_var("ACTIONLOG_CONFIG", config);
    }

    backend_bootstrap::run_standalone().await
}
