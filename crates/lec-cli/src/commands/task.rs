use lec_core::enums::{MaterialKind, OutputFormat, TaskStatus};
use lec_db::repos::task::TaskFilter;
use lec_db::updates::task::StatusPayload;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_params};
use crate::commands::shared::resolve::resolve_topic;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create {
            topic,
            kind,
            params,
        } => {
            let kind = parse_enum::<MaterialKind>(kind, "kind")?;
            let params = parse_params(params.as_deref())?;
            let topic = resolve_topic(&ctx.service, topic).await?;
            let task = ctx.service.create_task(&topic.id, kind, params).await?;
            output(&task, flags.format)
        }
        TaskCommands::Get { id } => {
            let task = ctx.service.get_task(id).await?;
            output(&task, flags.format)
        }
        TaskCommands::List {
            status,
            kind,
            topic,
            limit,
        } => {
            let topic_id = match topic {
                Some(key) => Some(resolve_topic(&ctx.service, key).await?.id),
                None => None,
            };
            let filter = TaskFilter {
                status: status
                    .as_deref()
                    .map(|raw| parse_enum::<TaskStatus>(raw, "status"))
                    .transpose()?,
                kind: kind
                    .as_deref()
                    .map(|raw| parse_enum::<MaterialKind>(raw, "kind"))
                    .transpose()?,
                topic_id,
                limit: Some(effective_limit(
                    *limit,
                    flags.limit,
                    &ctx.config.general,
                )?),
            };
            let tasks = ctx.service.list_tasks(&filter).await?;
            output(&tasks, flags.format)
        }
        TaskCommands::Pending => {
            let tasks = ctx.service.list_pending().await?;
            output(&tasks, flags.format)
        }
        TaskCommands::Status {
            id,
            status,
            path,
            file_format,
            error,
        } => {
            let to = parse_enum::<TaskStatus>(status, "status")?;
            let payload = StatusPayload {
                storage_path: path.clone(),
                format: file_format
                    .as_deref()
                    .map(|raw| parse_enum::<OutputFormat>(raw, "file format"))
                    .transpose()?,
                error: error.clone(),
            };
            let task = ctx.service.update_status(id, to, payload).await?;
            output(&task, flags.format)
        }
    }
}
