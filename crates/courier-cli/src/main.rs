//! Courier CLI - Discord webhook notifications from the terminal
//!
//! Sends messages through the same channel applications use, so payloads
//! can be previewed and tested without writing code.

mod compose;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use courier::{AnonymousNotifiable, Notifiable, DISCORD_ROUTE};
use courier_discord::{DiscordContent, DiscordFormatter, DiscordWebhookChannel, ToDiscord};
use courier_http::{HttpTransportConfig, ReqwestTransport};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use compose::{MessageArgs, SlackArgs};
use config::Config;

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Courier CLI - Discord webhook notifications", long_about = None)]
#[command(version)]
struct Cli {
    /// Log channel and transport activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a Discord message
    Send {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Send a Slack-style message through the webhook's /slack endpoint
    Slack {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        message: SlackArgs,
    },

    /// Print the request a Discord message would produce, without sending
    Preview {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Manage named webhooks
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Named webhook (defaults to the configured default)
    #[arg(short, long)]
    webhook: Option<String>,
    /// Webhook URL (overrides --webhook)
    #[arg(long)]
    url: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Add a webhook
    Add {
        /// Webhook name (e.g., "ci", "ops")
        name: String,
        /// Discord webhook URL
        url: String,
        /// Description (optional)
        #[arg(long)]
        description: Option<String>,
    },
    /// List all webhooks
    List,
    /// Set default webhook
    SetDefault {
        /// Webhook name to set as default
        name: String,
    },
    /// Remove a webhook
    Remove {
        /// Webhook name to remove
        name: String,
    },
}

/// Notification carrying an already rendered message
struct PreparedNotification(DiscordContent);

impl ToDiscord for PreparedNotification {
    fn to_discord(&self, _notifiable: &dyn Notifiable) -> DiscordContent {
        self.0.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Send { target, message } => {
            let message = message.build()?;
            cmd_deliver(target, message.into()).await
        }
        Commands::Slack { target, message } => {
            let message = message.build()?;
            cmd_deliver(target, message.into()).await
        }
        Commands::Preview { target, message } => cmd_preview(target, message),
        Commands::Webhook { action } => cmd_webhook(action),
        Commands::Config => cmd_config(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================
// Command Implementations
// ============================================

fn resolve_recipient(target: &TargetArgs) -> Result<AnonymousNotifiable> {
    let url = match &target.url {
        Some(url) => Some(url.clone()),
        None => Config::load()?.webhook_url(target.webhook.as_deref()),
    };

    if target.url.is_none() && url.is_none() {
        if let Some(name) = &target.webhook {
            bail!("Webhook '{}' not found. Run 'courier webhook list'.", name);
        }
    }

    debug!(webhook = ?target.webhook, resolved = url.is_some(), "Resolved destination");

    let recipient = AnonymousNotifiable::new();
    Ok(match url {
        Some(url) => recipient.route(DISCORD_ROUTE, url),
        None => recipient,
    })
}

async fn cmd_deliver(target: TargetArgs, content: DiscordContent) -> Result<()> {
    let recipient = resolve_recipient(&target)?;

    let mut transport_config = HttpTransportConfig::from_env();
    if let Some(secs) = target.timeout {
        transport_config = transport_config.with_timeout(Duration::from_secs(secs));
    }
    let transport =
        ReqwestTransport::with_config(transport_config).context("Failed to build HTTP client")?;
    let channel = DiscordWebhookChannel::new(transport);

    let response = channel
        .send(&recipient, &PreparedNotification(content))
        .await
        .context("Webhook delivery failed")?;

    match response {
        Some(response) => {
            println!("{} Delivered (HTTP {})", "✓".green(), response.status);
            if !response.body.trim().is_empty() {
                println!("{}", response.body.dimmed());
            }
            Ok(())
        }
        None => {
            println!("{}", "Nothing sent: no webhook configured.".yellow());
            println!("\n{}", "Add one with:".dimmed());
            println!("  courier webhook add <name> <URL>");
            println!("  courier webhook set-default <name>");
            bail!("No destination webhook");
        }
    }
}

fn cmd_preview(target: TargetArgs, message: MessageArgs) -> Result<()> {
    let recipient = resolve_recipient(&target)?;
    let base_url = recipient
        .route_notification_for(DISCORD_ROUTE)
        .unwrap_or_else(|| "<webhook-url>".to_string());

    let content = DiscordContent::from(message.build()?);
    let request = DiscordFormatter::new().format(&base_url, &content);

    println!("{} {}", "POST".bold(), request.url.cyan());
    let pretty = serde_json::to_string_pretty(&request.options.to_value())
        .context("Failed to render request options")?;
    println!("{}", pretty);

    Ok(())
}

fn cmd_webhook(action: WebhookAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        WebhookAction::Add {
            name,
            url,
            description,
        } => {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Webhook URL must start with http:// or https://");
            }
            let first = config.webhooks.is_empty();
            config.add_webhook(name.clone(), url, description);
            if first {
                config.set_default_webhook(name.clone());
            }
            config.save()?;
            println!("{} Webhook '{}' added", "✓".green(), name);
            if first {
                println!("  (set as default)");
            }
        }

        WebhookAction::List => {
            if config.webhooks.is_empty() {
                println!("No webhooks configured.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  courier webhook add <name> <URL>");
                return Ok(());
            }

            println!("{}", "Webhooks:".bold());
            for (name, webhook) in &config.webhooks {
                let is_default = config.default_webhook.as_ref() == Some(name);
                let default_marker = if is_default {
                    " (default)".green().to_string()
                } else {
                    String::new()
                };
                let description = webhook.description.as_deref().unwrap_or("-");

                println!(
                    "  {} {} {}{}",
                    name.cyan(),
                    description.dimmed(),
                    redact(&webhook.url),
                    default_marker
                );
            }
        }

        WebhookAction::SetDefault { name } => {
            if config.set_default_webhook(name.clone()) {
                config.save()?;
                println!("{} Default webhook set to '{}'", "✓".green(), name);
            } else {
                bail!("Webhook '{}' not found", name);
            }
        }

        WebhookAction::Remove { name } => {
            if config.remove_webhook(&name) {
                config.save()?;
                println!("{} Webhook '{}' removed", "✓".green(), name);
            } else {
                bail!("Webhook '{}' not found", name);
            }
        }
    }

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {}", path.display());
    println!(
        "  Default webhook: {}",
        config.default_webhook.as_deref().unwrap_or("(not set)")
    );
    println!("  Webhooks: {}", config.webhooks.len());

    Ok(())
}

/// Hide the token segment of a webhook URL
fn redact(url: &str) -> String {
    match url.rsplit_once('/') {
        Some((prefix, token)) if token.chars().count() > 6 => {
            let visible: String = token.chars().take(6).collect();
            format!("{}/{}…", prefix, visible)
        }
        _ => url.to_string(),
    }
}
