use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use edutree::api::CategoryClient;
use edutree::app::{App, AppEvent, CategoryTreeView};
use edutree::config::Config;
use edutree::ui;

/// Get the config directory path (~/.config/edutree/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("edutree"))
}

#[derive(Parser, Debug)]
#[command(name = "edutree", about = "Terminal browser for an education platform's category tree")]
struct Args {
    /// Base URL of the platform API (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file to use instead of ~/.config/edutree/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fetch once, print the tree to stdout and exit
    #[arg(long)]
    print: bool,

    /// Filter the printed tree by name, slug or description (with --print)
    #[arg(long, value_name = "TERM", requires = "print")]
    search: Option<String>,

    /// Auto-expand nodes shallower than this depth
    #[arg(long, value_name = "N")]
    expand_depth: Option<usize>,
}

/// Send logs to stderr in print mode and to a file otherwise, since stderr
/// output would corrupt the alternate screen.
fn init_tracing(print_mode: bool, config_dir: &Path) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    if print_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    std::fs::create_dir_all(config_dir).with_context(|| {
        format!(
            "Failed to create config directory '{}'",
            config_dir.display()
        )
    })?;
    let log_path = config_dir.join("edutree.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn print_tree(client: &CategoryClient, config: &Config, search: Option<&str>) -> Result<()> {
    let mut view = CategoryTreeView::new(config.expand_depth, config.search_debounce());
    if !view.load(client).await {
        let error = view.load_error().unwrap_or("unknown error");
        anyhow::bail!("Failed to load categories: {}", error);
    }

    if let Some(term) = search {
        view.on_search_change(term);
        view.flush_search();
    }

    for line in ui::plain_report(&view) {
        println!("{}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    init_tracing(args.print, &config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(depth) = args.expand_depth {
        config.expand_depth = depth;
    }
    tracing::debug!(?config, "Effective configuration");

    let client = CategoryClient::new(
        &config.api_base_url,
        config.resolve_token(),
        config.request_timeout(),
    )
    .context("Failed to create API client")?;

    if args.print {
        return print_tree(&client, &config, args.search.as_deref()).await;
    }

    let mut app = App::new(client, &config);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}
