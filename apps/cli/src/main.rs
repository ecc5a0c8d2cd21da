use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tldw_core::{
    Delivery, HostConfig, HttpOptions, Payload, Provider, StdoutNotifier, SummaryConfig,
    SystemClipboard, deliver, describe_transcript, extract_transcript, fetch_host_config,
    request_summary,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Deepseek,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Deepseek => Provider::Deepseek,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Parser)]
#[command(name = "tldw")]
#[command(about = "Pull a YouTube video's caption transcript and optionally summarize it")]
struct Cli {
    /// Video watch page URL
    #[arg(required_unless_present = "host_config")]
    url: Option<String>,

    /// Read the page's player globals from a JSON file instead of fetching the watch page.
    /// Expects `{"ytInitialPlayerResponse": ...}` or `{"ytplayer": {"config": {"args": {"raw_player_response": ...}}}}`.
    #[arg(long, conflicts_with = "url")]
    host_config: Option<PathBuf>,

    /// Summarize the transcript instead of printing it
    #[arg(short, long)]
    summarize: bool,

    /// AI provider for summaries
    #[arg(short, long, default_value = "deepseek")]
    provider: CliProvider,

    /// Override the provider's default model
    #[arg(long)]
    model: Option<String>,

    /// Override the provider's chat-completion endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// API key. Defaults to the provider's environment variable (e.g. DEEPSEEK_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Per-request timeout in seconds, 0 to wait forever
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Do not copy the result to the clipboard
    #[arg(long)]
    no_copy: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "tldw=debug,tldw_core=debug"
    } else {
        "tldw=info,tldw_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn summary_config(cli: &Cli) -> SummaryConfig {
    let provider: Provider = cli.provider.clone().into();
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var(provider.config().env_var).ok());

    let mut config = SummaryConfig::for_provider(provider, api_key);
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    config
}

async fn load_host_config(cli: &Cli, client: &reqwest::Client) -> Result<HostConfig> {
    if let Some(path) = &cli.host_config {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        return Ok(HostConfig::from_json_str(&json)?);
    }

    let url = cli
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("a video URL or --host-config is required"))?;
    let step_start = Instant::now();
    let spinner = create_spinner("Loading watch page...");
    let host = fetch_host_config(client, url).await;
    spinner.finish_and_clear();
    let host = host?;
    println!(
        "{} Watch page loaded {}",
        style("✓").green().bold(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    );
    Ok(host)
}

async fn run(cli: Cli) -> Result<()> {
    let summary_config = cli.summarize.then(|| summary_config(&cli));

    // Validate API key early
    if let Some(config) = &summary_config {
        config.bearer_token()?;
    }

    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let client = HttpOptions::default().with_timeout(timeout).build_client()?;

    println!(
        "\n{}  {}\n",
        style("tldw").cyan().bold(),
        style("Caption Summarizer").dim()
    );

    let total_start = Instant::now();
    let host = load_host_config(&cli, &client).await?;

    let step_start = Instant::now();
    let spinner = create_spinner("Fetching captions...");
    let transcript = extract_transcript(&host, &client).await;
    spinner.finish_and_clear();
    let transcript = transcript?;
    println!(
        "{} Transcript: {} {}",
        style("✓").green().bold(),
        describe_transcript(&transcript),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    );

    let text = transcript.text();
    let summary = match &summary_config {
        Some(_) if transcript.is_empty() => {
            tracing::warn!("caption track has no text, skipping summary");
            None
        }
        Some(config) => {
            let step_start = Instant::now();
            let spinner = create_spinner(&format!("Summarizing with {}...", config.provider_name));
            let summary = request_summary(&client, &text, config).await;
            spinner.finish_and_clear();
            let summary = summary?;
            println!(
                "{} Summary generated ({}) {}",
                style("✓").green().bold(),
                config.provider_name,
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            );
            Some(summary)
        }
        None => None,
    };

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!("{}", style("─".repeat(60)).dim());

    let payload = match &summary {
        Some(summary) => Payload::Summary(summary),
        None => Payload::Transcript(&text),
    };
    let clipboard = SystemClipboard;
    let clipboard = (!cli.no_copy).then_some(&clipboard);
    if deliver(clipboard, &StdoutNotifier, payload).await == Delivery::Lost {
        tracing::warn!("result could not be displayed");
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow!("Interrupted")),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
