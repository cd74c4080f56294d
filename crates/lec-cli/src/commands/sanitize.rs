use lec_core::responses::SanitizeResponse;
use lec_core::slug::{is_valid_slug, sanitize};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SanitizeArgs;
use crate::output::output;

/// Handle `lec sanitize`. Needs no ledger.
pub fn handle(args: &SanitizeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&sanitize_response(&args.name), flags.format)
}

fn sanitize_response(name: &str) -> SanitizeResponse {
    let slug = sanitize(name);
    SanitizeResponse {
        name: name.to_string(),
        valid: is_valid_slug(&slug),
        slug,
    }
}
