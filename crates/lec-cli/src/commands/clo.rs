use lec_core::enums::BloomLevel;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CloCommands;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::resolve::resolve_topic;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec clo`.
pub async fn handle(action: &CloCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CloCommands::Add { topic, text, bloom } => {
            let bloom = bloom
                .as_deref()
                .map(|raw| parse_enum::<BloomLevel>(raw, "bloom level"))
                .transpose()?;
            let topic = resolve_topic(&ctx.service, topic).await?;
            let clo = ctx.service.add_clo(&topic.id, text, bloom).await?;
            output(&clo, flags.format)
        }
        CloCommands::List { topic } => {
            let topic = resolve_topic(&ctx.service, topic).await?;
            let clos = ctx.service.list_clos(&topic.id).await?;
            output(&clos, flags.format)
        }
    }
}
