//! Deep Research command line
//!
//! `deep-research [--json] <question...>` runs one research and prints the
//! answer; `deep-research serve` starts the HTTP surface.

use anyhow::Result;
use deep_research::{
    config,
    web::{create_router, AppState},
    Answer, ResearchError, Researcher,
};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut json = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("deep-research {}", deep_research::VERSION);
                return Ok(());
            }
            "--json" => json = true,
            _ => words.push(arg),
        }
    }

    info!("Starting Deep Research v{}", deep_research::VERSION);
    let settings = config::load()?;

    if words.len() == 1 && words[0] == "serve" {
        return serve(settings).await;
    }

    let question = words.join(" ");
    if question.trim().is_empty() {
        print_usage();
        std::process::exit(2);
    }

    let researcher = Researcher::from_settings(&settings)?;
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping research");
            ctrl_c.cancel();
        }
    });

    match researcher.run(&question, cancel).await {
        Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
        Ok(report) => {
            println!("{}", report.answer);
            if let Answer::Synthesized(_) = report.answer {
                println!("\nSources:");
                for entry in report.context.entries() {
                    println!("  - {}", entry.url);
                }
            }
        }
        Err(err) => {
            error!("{}", err);
            if let ResearchError::SynthesisFailed { ref context, .. } = err {
                eprintln!("Collected context before the failure:\n{}", context.render());
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn serve(settings: config::Settings) -> Result<()> {
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let state = AppState::new(settings)?;
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Deep Research v{}
An iterative web research agent

USAGE:
    deep-research [--json] <QUESTION...>
    deep-research serve

OPTIONS:
        --json             Print the full report as JSON
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    DEEP_RESEARCH_SETTINGS_PATH  Path to settings.yml
    OPENAI_API_KEY               API key for the language model
    OPENAI_MODEL_NAME            Model name (default o3-mini)
    DEEP_RESEARCH_LLM_BASE_URL   OpenAI-compatible API base URL
    GOOGLE_API_KEY               Google Custom Search API key
    GOOGLE_CSE_ID                Google Custom Search engine id
    DEEP_RESEARCH_MAX_DEPTH      Follow-up depth limit
    DEEP_RESEARCH_MAX_QUERIES    Query budget
    DEEP_RESEARCH_PORT           Server port for `serve`
    DEEP_RESEARCH_BIND_ADDRESS   Bind address for `serve`
    RUST_LOG                     Log filter (default info)
"#,
        deep_research::VERSION
    );
}
