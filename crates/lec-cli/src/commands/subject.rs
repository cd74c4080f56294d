use lec_db::updates::subject::SubjectUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SubjectCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::resolve::resolve_subject;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec subject`.
pub async fn handle(
    action: &SubjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SubjectCommands::Create { name, description } => {
            let subject = ctx
                .service
                .register_subject(name, description.as_deref())
                .await?;
            output(&subject, flags.format)
        }
        SubjectCommands::Get { subject } => {
            let subject = resolve_subject(&ctx.service, subject).await?;
            output(&subject, flags.format)
        }
        SubjectCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, &ctx.config.general)?;
            let subjects = ctx.service.list_subjects(limit).await?;
            output(&subjects, flags.format)
        }
        SubjectCommands::Update {
            subject,
            name,
            description,
        } => {
            let current = resolve_subject(&ctx.service, subject).await?;
            let mut builder = SubjectUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name.as_str());
            }
            if let Some(description) = description {
                // An empty description clears it.
                builder = builder.description(Some(description.clone()).filter(|d| !d.is_empty()));
            }
            let updated = ctx
                .service
                .update_subject(&current.id, builder.build())
                .await?;
            output(&updated, flags.format)
        }
        SubjectCommands::Delete { subject } => {
            let current = resolve_subject(&ctx.service, subject).await?;
            let deleted = ctx.service.delete_subject(&current.id).await?;
            output(&deleted, flags.format)
        }
        SubjectCommands::Stats { subject } => {
            let current = resolve_subject(&ctx.service, subject).await?;
            let stats = ctx.service.subject_stats(&current.id).await?;
            output(&stats, flags.format)
        }
    }
}
