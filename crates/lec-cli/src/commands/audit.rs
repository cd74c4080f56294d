use lec_core::enums::{AuditAction, EntityType};
use lec_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lec audit`. Newest entries first.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|raw| parse_enum::<EntityType>(raw, "entity type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|raw| parse_enum::<AuditAction>(raw, "action"))
            .transpose()?,
        limit: Some(effective_limit(
            None,
            flags.limit,
            &ctx.config.general,
        )?),
    };
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
