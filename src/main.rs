//! Hypnos - 肯定语语音合成服务
//!
//! 默认启动 HTTP 服务；运维子命令见 `hypnos --help`

mod bootstrap;
mod cli;

use clap::Parser;

use hypnos::config::{load_config, load_config_from_path, print_config, LogConfig};
use hypnos::infrastructure::http::{AppState, HandlerLimits, HttpServer, ServerConfig};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match args.config.as_deref() {
        Some(path) => load_config_from_path(Some(path)),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    print_config(&config);

    let ports = bootstrap::build_ports(&config).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {}
        Command::Voices => return cli::run_voices(&ports).await,
        Command::Estimate => return cli::run_estimate(&ports).await,
        Command::GenerateDefaults(gen_args) => {
            return cli::run_generate_defaults(&ports, &config, gen_args).await
        }
        Command::SetPlan { email, plan } => return cli::run_set_plan(&ports, email, &plan).await,
    }

    let limits = HandlerLimits {
        max_concurrent: config.generation.max_concurrent,
        max_upload_size: config.storage.max_upload_size,
    };
    let state = AppState::new(ports, limits);
    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},hypnos={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
