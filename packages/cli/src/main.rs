// ABOUTME: Webforge CLI entry point
// ABOUTME: Wires prompt -> plan -> sandbox mount -> build cycle -> terminal preview

mod generate;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webforge_builder::{BuildOptions, BuildOrchestrator};
use webforge_sandbox::{LocalSandbox, Sandbox};

#[derive(Debug, Parser)]
#[command(
    name = "webforge",
    version,
    about = "Describe a website and watch it build and preview in a sandbox"
)]
struct Args {
    /// Natural-language description of the website to build
    prompt: Option<String>,

    /// Read artifact markup from a file instead of calling the generation API
    #[arg(long, value_name = "FILE")]
    plan: Option<PathBuf>,

    /// Template override: react or node (skips the template decision call)
    #[arg(long, value_name = "KIND")]
    template: Option<String>,

    /// Override the install command (default: npm install)
    #[arg(long, value_name = "CMD")]
    install_cmd: Option<String>,

    /// Override the dev-server command (default: npm run dev)
    #[arg(long, value_name = "CMD")]
    dev_cmd: Option<String>,

    /// Fail the build when the dev server stays silent this long
    #[arg(long, value_name = "SECONDS")]
    ready_timeout: Option<u64>,

    /// Keep the sandbox directory around after exit
    #[arg(long)]
    keep: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webforge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Split a user-supplied command line into program and arguments.
fn parse_command(raw: &str) -> Result<(String, Vec<String>)> {
    let mut parts = raw.split_whitespace().map(str::to_string);
    let program = parts.next().context("command must not be empty")?;
    Ok((program, parts.collect()))
}

fn build_options(args: &Args) -> Result<BuildOptions> {
    let mut options = BuildOptions::from_env();
    if let Some(raw) = &args.install_cmd {
        let (command, command_args) = parse_command(raw)?;
        options.install_command = command;
        options.install_args = command_args;
    }
    if let Some(raw) = &args.dev_cmd {
        let (command, command_args) = parse_command(raw)?;
        options.dev_command = command;
        options.dev_args = command_args;
    }
    if let Some(secs) = args.ready_timeout {
        if secs == 0 {
            bail!("--ready-timeout must be at least 1 second");
        }
        options.ready_timeout = Some(Duration::from_secs(secs));
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let (files, steps) = generate::resolve_plan(&args).await?;
    println!("{}", "Build plan".bold());
    for step in &steps {
        println!("  {:>2}. {}", step.id, step.title);
    }
    println!();

    let sandbox = Arc::new(LocalSandbox::new().await?);
    sandbox.mount(&files).await?;
    info!("Project mounted at {}", sandbox.root().display());

    let orchestrator = BuildOrchestrator::new(build_options(&args)?);
    let handle: Arc<dyn Sandbox> = sandbox.clone();
    orchestrator.run_build_cycle(Some(handle), &files);

    let endpoint = render::render_build(&orchestrator).await?;

    let succeeded = endpoint.is_some();
    if succeeded {
        println!("{}", "Press Ctrl-C to stop.".dimmed());
        tokio::signal::ctrl_c().await?;
    }

    if !args.keep {
        sandbox.cleanup().await.ok();
    }

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
