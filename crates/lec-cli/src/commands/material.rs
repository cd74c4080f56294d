use lec_core::enums::MaterialKind;
use lec_core::errors::CoreError;
use lec_db::repos::material::MaterialFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MaterialCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::resolve::resolve_topic;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec material`.
pub async fn handle(
    action: &MaterialCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MaterialCommands::Get { id, topic, kind } => {
            let material = match (id, topic, kind) {
                (Some(id), _, _) => ctx.service.get_material(id).await?,
                (None, Some(topic), Some(kind)) => {
                    let kind = parse_enum::<MaterialKind>(kind, "kind")?;
                    let topic = resolve_topic(&ctx.service, topic).await?;
                    ctx.service.get_current(&topic.id, kind).await?
                }
                _ => {
                    return Err(CoreError::Validation(
                        "pass a material ID, or --topic with --kind".into(),
                    )
                    .into());
                }
            };
            output(&material, flags.format)
        }
        MaterialCommands::List { topic, kind, limit } => {
            let topic_id = match topic {
                Some(key) => Some(resolve_topic(&ctx.service, key).await?.id),
                None => None,
            };
            let filter = MaterialFilter {
                topic_id,
                kind: kind
                    .as_deref()
                    .map(|raw| parse_enum::<MaterialKind>(raw, "kind"))
                    .transpose()?,
                limit: Some(effective_limit(
                    *limit,
                    flags.limit,
                    &ctx.config.general,
                )?),
            };
            let materials = ctx.service.list_materials(&filter).await?;
            output(&materials, flags.format)
        }
        MaterialCommands::History { id } => {
            let revisions = ctx.service.material_history(id).await?;
            output(&revisions, flags.format)
        }
    }
}
