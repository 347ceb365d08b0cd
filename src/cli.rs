//! 命令行入口：服务与运维子命令

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand};

use hypnos::application::{
    EstimateCatalog, EstimateCatalogHandler, GenerateDefaults, GenerateDefaultsHandler,
    ListProviderVoices, ListProviderVoicesHandler, SetUserPlan, SetUserPlanHandler,
};
use hypnos::config::AppConfig;
use hypnos::domain::{Category, Plan};
use hypnos::infrastructure::http::AppPorts;

#[derive(Debug, Parser)]
#[command(name = "hypnos", version, about = "Affirmation audio service")]
pub struct Cli {
    /// 配置文件路径（默认读取 config.toml）
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 列出服务商音色
    Voices,
    /// 估算生成全部默认肯定语所需字符数
    Estimate,
    /// 为默认肯定语批量生成音频
    GenerateDefaults(GenerateDefaultsArgs),
    /// 修改用户订阅计划
    SetPlan {
        #[arg(long)]
        email: String,
        /// free | premium
        #[arg(long)]
        plan: String,
    },
}

#[derive(Debug, Args)]
pub struct GenerateDefaultsArgs {
    #[arg(long, conflicts_with = "voice_name", required_unless_present = "voice_name")]
    pub voice_id: Option<String>,
    /// 按名称查找音色（忽略大小写）
    #[arg(long)]
    pub voice_name: Option<String>,
    /// 分类名称或 slug，例如 sono
    #[arg(long)]
    pub category: Option<String>,
    /// 每个分类最多生成条数
    #[arg(long)]
    pub count: Option<usize>,
    /// 忽略已有音频重新生成
    #[arg(long)]
    pub force: bool,
}

pub async fn run_voices(ports: &AppPorts) -> anyhow::Result<()> {
    let handler = ListProviderVoicesHandler::new(ports.tts_engine.clone());
    let grouped = handler.handle(ListProviderVoices).await?;

    let groups = [
        ("Premade", &grouped.premade),
        ("Cloned", &grouped.cloned),
        ("Generated", &grouped.generated),
        ("Other", &grouped.other),
    ];
    for (label, voices) in groups {
        if voices.is_empty() {
            continue;
        }
        println!("{} ({})", label, voices.len());
        for voice in voices {
            println!("  {:<24} {}", voice.voice_id, voice.name);
        }
    }
    println!("Total: {}", grouped.total);
    Ok(())
}

pub async fn run_estimate(ports: &AppPorts) -> anyhow::Result<()> {
    let handler = EstimateCatalogHandler::new(ports.affirmations.clone(), ports.tts_engine.clone());
    let estimate = handler.handle(EstimateCatalog).await?;

    for usage in &estimate.categories {
        println!(
            "{:<16} {:>4} affirmations {:>8} characters",
            usage.name, usage.count, usage.characters
        );
    }
    println!(
        "Total: {} affirmations, {} characters",
        estimate.total_count, estimate.total_characters
    );
    match estimate.remaining_characters {
        Some(remaining) => println!("Remaining quota: {}", remaining),
        None => println!("Remaining quota: unknown"),
    }
    if estimate.is_sufficient() == Some(false) {
        tracing::warn!(
            required = estimate.total_characters,
            remaining = ?estimate.remaining_characters,
            "Not enough characters remaining to generate the whole catalog"
        );
    }
    Ok(())
}

pub async fn run_generate_defaults(
    ports: &AppPorts,
    config: &AppConfig,
    args: GenerateDefaultsArgs,
) -> anyhow::Result<()> {
    let category = match args.category.as_deref() {
        Some(name) => Some(
            Category::from_name(name).ok_or_else(|| anyhow!("Unknown category: {}", name))?,
        ),
        None => None,
    };

    let voice_id = match (args.voice_id, args.voice_name) {
        (Some(id), _) => id,
        (None, Some(name)) => resolve_voice_name(ports, &name).await?,
        (None, None) => bail!("--voice-id or --voice-name is required"),
    };

    let handler = GenerateDefaultsHandler::new(
        ports.affirmations.clone(),
        Arc::new(ports.materializer()),
        ports.tts_engine.clone(),
        Duration::from_secs(config.generation.rate_limit_backoff_secs),
    );

    tracing::info!(voice_id = %voice_id, category = ?category, "Generating default affirmations");
    let report = handler
        .handle(GenerateDefaults {
            voice_id,
            category,
            count: args.count,
            force: args.force,
        })
        .await?;

    println!("Generated: {}", report.generated);
    println!("Skipped:   {}", report.skipped);
    println!("Failed:    {}", report.failed);
    println!("Characters used: {}", report.characters_used);
    Ok(())
}

async fn resolve_voice_name(ports: &AppPorts, name: &str) -> anyhow::Result<String> {
    let handler = ListProviderVoicesHandler::new(ports.tts_engine.clone());
    let grouped = handler.handle(ListProviderVoices).await?;

    grouped
        .premade
        .iter()
        .chain(&grouped.cloned)
        .chain(&grouped.generated)
        .chain(&grouped.other)
        .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
        .map(|v| v.voice_id.clone())
        .ok_or_else(|| anyhow!("Voice not found: {}", name))
}

pub async fn run_set_plan(ports: &AppPorts, email: String, plan: &str) -> anyhow::Result<()> {
    let plan = Plan::from_str(plan).ok_or_else(|| anyhow!("Invalid plan: {}", plan))?;
    let handler = SetUserPlanHandler::new(ports.users.clone());
    let user = handler.handle(SetUserPlan { email, plan }).await?;
    println!("{} -> {}", user.email, user.plan.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["hypnos"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from([
            "hypnos",
            "generate-defaults",
            "--voice-id",
            "abc",
            "--category",
            "sono",
            "--count",
            "3",
            "--force",
        ])
        .unwrap();
        match cli.command {
            Some(Command::GenerateDefaults(args)) => {
                assert_eq!(args.voice_id.as_deref(), Some("abc"));
                assert_eq!(args.category.as_deref(), Some("sono"));
                assert_eq!(args.count, Some(3));
                assert!(args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generate_defaults_requires_voice() {
        assert!(Cli::try_parse_from(["hypnos", "generate-defaults"]).is_err());
        assert!(Cli::try_parse_from([
            "hypnos",
            "generate-defaults",
            "--voice-id",
            "a",
            "--voice-name",
            "b"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_set_plan() {
        let cli = Cli::try_parse_from([
            "hypnos",
            "--config",
            "prod.toml",
            "set-plan",
            "--email",
            "a@b.com",
            "--plan",
            "premium",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));
        assert!(matches!(cli.command, Some(Command::SetPlan { .. })));
    }
}
