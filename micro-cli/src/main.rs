//! Micro app loader CLI
//!
//! Loads one remote micro application into a synthetic host document and
//! prints what was mounted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use micro_app::{AppStatus, Host, MicroAppConfig, MicroAppError, SourceKind, SourceRecord};
use micro_dom::{AttributesMap, DomTree, NodeId};
use micro_html::{inner_html, print_tree};
use micro_js::JsRuntime;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Load a remote HTML micro application and show the mounted result
#[derive(Parser, Debug)]
#[command(name = "micro")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Load an app and print the mounted DOM tree
    micro --url http://localhost:3000/

    # Print the container's HTML instead of the tree
    micro --url http://localhost:3000/ --html

    # Machine-readable report
    micro --url http://localhost:3000/ --json

    # Custom container tags and timeout
    micro --url http://localhost:3000/ --config micro.json -vv
"#)]
struct Cli {
    /// Base URL of the micro application
    #[arg(long, value_name = "URL")]
    url: String,

    /// Application name
    #[arg(long, default_value = "app")]
    name: String,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the DOM tree
    #[arg(long, conflicts_with = "html")]
    json: bool,

    /// Print the container's serialized HTML instead of the DOM tree
    #[arg(long)]
    html: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Summary printed by `--json`.
#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    url: &'a str,
    status: AppStatus,
    error: Option<String>,
    script_errors: Vec<String>,
    sources: Vec<SourceReport<'a>>,
    html: String,
}

#[derive(Serialize)]
struct SourceReport<'a> {
    key: &'a str,
    kind: SourceKind,
    external: bool,
    bytes: Option<usize>,
}

impl<'a> From<&'a SourceRecord> for SourceReport<'a> {
    fn from(record: &'a SourceRecord) -> Self {
        Self {
            key: record.key(),
            kind: record.kind(),
            external: record.is_external(),
            bytes: record.code().map(str::len),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => MicroAppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MicroAppConfig::default(),
    };
    let fetcher = config
        .http_fetcher()
        .context("creating HTTP client")?;

    let (document, container) = host_document();
    let host = Host::new(document, fetcher, JsRuntime::new(), config)
        .context("invalid configuration")?;
    let app = host
        .launch(&cli.name, &cli.url, container)
        .await
        .context("registering application")?;

    let app = app.borrow();
    let document = host.document();

    if cli.json {
        let report = Report {
            name: app.name(),
            url: app.url(),
            status: app.status(),
            error: app.failure().map(ToString::to_string),
            script_errors: app.script_errors().iter().map(ToString::to_string).collect(),
            sources: app.source().iter().map(SourceReport::from).collect(),
            html: inner_html(&document, container),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_status(app.name(), app.status(), app.failure());
        if cli.html {
            println!("{}", inner_html(&document, container));
        } else {
            println!("=== Host Document ===");
            print_tree(&document, document.root(), 0);
        }
        if !app.script_errors().is_empty() {
            println!("\n=== Script Errors ===");
            for error in app.script_errors() {
                println!("  - {error}");
            }
        }
    }

    if app.status() == AppStatus::Failed {
        anyhow::bail!("{} failed to load", app.name());
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level from `warn`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `<html><body><micro-app></micro-app></body></html>`
fn host_document() -> (DomTree, NodeId) {
    let mut document = DomTree::new();
    let html = document.create_element("html", AttributesMap::new());
    let body = document.create_element("body", AttributesMap::new());
    let container = document.create_element(micro_app::CONTAINER_TAG, AttributesMap::new());
    document.append_child(NodeId::ROOT, html);
    document.append_child(html, body);
    document.append_child(body, container);
    (document, container)
}

fn print_status(name: &str, status: AppStatus, failure: Option<&MicroAppError>) {
    let label = match status {
        AppStatus::Mounted => status.green().bold().to_string(),
        AppStatus::Failed => status.red().bold().to_string(),
        _ => status.yellow().to_string(),
    };
    println!("{} {label}", name.bold());
    if let Some(failure) = failure {
        println!("  {}", failure.red());
    }
}
