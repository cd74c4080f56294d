use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Subject { action } => commands::subject::handle(&action, ctx, flags).await,
        Commands::Topic { action } => commands::topic::handle(&action, ctx, flags).await,
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Material { action } => commands::material::handle(&action, ctx, flags).await,
        Commands::Clo { action } => commands::clo::handle(&action, ctx, flags).await,
        Commands::Stats => commands::stats::handle(ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Sanitize(_) => unreachable!("sanitize is pre-dispatched in main"),
    }
}
