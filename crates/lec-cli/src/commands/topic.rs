use lec_db::updates::topic::TopicUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TopicCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::resolve::{resolve_subject, resolve_topic};
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec topic`.
pub async fn handle(
    action: &TopicCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TopicCommands::Create {
            subject,
            name,
            description,
        } => {
            let subject = resolve_subject(&ctx.service, subject).await?;
            let topic = ctx
                .service
                .register_topic(&subject.id, name, description.as_deref())
                .await?;
            output(&topic, flags.format)
        }
        TopicCommands::Get { topic } => {
            let topic = resolve_topic(&ctx.service, topic).await?;
            output(&topic, flags.format)
        }
        TopicCommands::List { subject, limit } => {
            let subject = resolve_subject(&ctx.service, subject).await?;
            let limit = effective_limit(*limit, flags.limit, &ctx.config.general)?;
            let topics = ctx.service.list_topics(&subject.id, limit).await?;
            output(&topics, flags.format)
        }
        TopicCommands::Update {
            topic,
            name,
            description,
        } => {
            let current = resolve_topic(&ctx.service, topic).await?;
            let mut builder = TopicUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name.as_str());
            }
            if let Some(description) = description {
                builder = builder.description(Some(description.clone()).filter(|d| !d.is_empty()));
            }
            let updated = ctx.service.update_topic(&current.id, builder.build()).await?;
            output(&updated, flags.format)
        }
        TopicCommands::Delete { topic } => {
            let current = resolve_topic(&ctx.service, topic).await?;
            let deleted = ctx.service.delete_topic(&current.id).await?;
            output(&deleted, flags.format)
        }
    }
}
