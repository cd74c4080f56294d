use clap::Parser;
use lec_config::LecConfig;

mod cli;
mod commands;
mod context;
mod error;
mod output;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        let response = error::error_response(&err);
        let code = error::exit_code(error::error_kind(&err));
        match serde_json::to_string(&response) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("lec error: {err:#}"),
        }
        std::process::exit(code);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    if let cli::Commands::Sanitize(args) = &cli.command {
        return commands::sanitize::handle(args, &flags);
    }

    let config = LecConfig::load_with_dotenv()?;
    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    let ctx = context::AppContext::init(project_root, config).await?;
    tracing::debug!(root = %ctx.project_root.display(), "ledger ready");

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LECTERN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
