mod config;

use std::path::Path;

use clap::Parser;
use dingbot_core::{Credentials, DingbotError, DingbotResult, OutboundMessage};
use dingbot_notify::Robot;
use dingbot_report::{parse_reports, OwnerMap};
use tracing::{error, info, warn};

use config::RobotConfig;

const DEFAULT_CONFIG_PATH: &str = "dingbot.toml";

#[derive(Parser)]
#[command(name = "dingbot")]
#[command(about = "Send signed messages to a DingTalk group robot")]
struct Cli {
    #[arg(short = 'f', long, default_value = DEFAULT_CONFIG_PATH, help = "Path to config file")]
    config: String,
    #[arg(short = 'u', long, help = "Webhook URL, overrides config")]
    url: Option<String>,
    #[arg(short = 's', long, help = "Signing secret, overrides config")]
    secret: Option<String>,
    #[arg(short = 't', long, help = "Text message body")]
    text: Option<String>,
    #[arg(short = 'm', long, help = "Markdown message body")]
    markdown: Option<String>,
    #[arg(short = 'j', long, help = "Raw JSON payload, inline or a file path")]
    json: Option<String>,
    #[arg(short = 'd', long, help = "Build report, inline HTML or a file path")]
    report: Option<String>,
    #[arg(
        short = 'a',
        long,
        value_delimiter = ',',
        help = "Phones to mention, comma-separated"
    )]
    at: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dingbot=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Errors are reported, never fatal: build pipelines calling this tool
    // must not break because a notification could not be posted.
    if let Err(e) = run(cli).await {
        error!(error = %e, "dingbot run failed");
    }
}

async fn run(cli: Cli) -> DingbotResult<()> {
    let mut config = load_config(&cli.config)?;
    apply_overrides(&mut config, cli);
    config.validate()?;

    if let Some(name) = &config.robot_name {
        info!(robot = %name, "sending as configured robot");
    }

    let robot = Robot::new(Credentials {
        webhook_url: config.webhook_url.clone(),
        secret_key: config.secret_key.clone(),
    });

    if !config.text.is_empty() {
        robot
            .send(&OutboundMessage::text(
                config.text.clone(),
                config.mobiles.clone(),
            ))
            .await
    } else if !config.markdown.is_empty() {
        let title = config
            .robot_name
            .clone()
            .unwrap_or_else(|| "TITLE".to_string());
        robot
            .send(&OutboundMessage::markdown(
                title,
                config.markdown.clone(),
                config.mobiles.clone(),
            ))
            .await
    } else if !config.json.is_empty() {
        let payload = resolve_content(&config.json)?;
        robot.send(&OutboundMessage::raw(payload)).await
    } else {
        send_report_alerts(&robot, &config).await
    }
}

/// Flags beat file values field-for-field; flags left unset keep the
/// file value, including an omitted `-a` mention list.
fn apply_overrides(config: &mut RobotConfig, cli: Cli) {
    if let Some(url) = cli.url {
        config.webhook_url = url;
    }
    if let Some(secret) = cli.secret {
        config.secret_key = secret;
    }
    if let Some(text) = cli.text {
        config.text = text;
    }
    if let Some(markdown) = cli.markdown {
        config.markdown = markdown;
    }
    if let Some(json) = cli.json {
        config.json = json;
    }
    if let Some(report) = cli.report {
        config.report = report;
    }
    if !cli.at.is_empty() {
        config.mobiles = cli.at;
    }
}

fn load_config(path: &str) -> DingbotResult<RobotConfig> {
    if Path::new(path).exists() {
        return RobotConfig::from_file(path);
    }
    // A missing default config is fine when flags supply everything;
    // an explicitly named file must exist.
    if path == DEFAULT_CONFIG_PATH {
        warn!(path = %path, "default config file not found, relying on flags");
        Ok(RobotConfig::default())
    } else {
        Err(DingbotError::Config(format!(
            "config file not found: {}",
            path
        )))
    }
}

/// Values that name an existing file are read from disk, anything else is
/// used verbatim. Shared by the raw-JSON and report selectors.
fn resolve_content(value: &str) -> DingbotResult<String> {
    if Path::new(value).is_file() {
        Ok(std::fs::read_to_string(value)?)
    } else {
        Ok(value.to_string())
    }
}

/// Scrape the report and send one alert per failing row, each mentioning
/// the owner of the product. Sends are isolated: a failed delivery is
/// logged and the rest of the batch still goes out.
async fn send_report_alerts(robot: &Robot, config: &RobotConfig) -> DingbotResult<()> {
    let html = resolve_content(&config.report)?;
    let reports = parse_reports(&html);
    if reports.is_empty() {
        info!("report contains no failures, nothing to send");
        return Ok(());
    }

    let owners = OwnerMap::from_groups(&config.owners);
    if owners.is_empty() {
        warn!("no valid [owners] entries, all alerts go to the fallback owner");
    }

    for report in &reports {
        for entry in &report.entries {
            let owner = owners.resolve(&entry.product).to_string();
            let message = OutboundMessage::text(
                format!("{} {}\n{}", report.version, entry.product, entry.detail),
                vec![owner],
            );
            if let Err(e) = robot.send(&message).await {
                error!(
                    version = %report.version,
                    product = %entry.product,
                    error = %e,
                    "report alert failed"
                );
            }
        }
    }
    Ok(())
}
