use lec_config::GeneralConfig;
use lec_core::errors::CoreError;

/// Pick the listing limit: subcommand `--limit`, then global `--limit`, then
/// `general.default_limit`, all capped at `general.max_limit`.
pub fn effective_limit(
    local: Option<u32>,
    global: Option<u32>,
    general: &GeneralConfig,
) -> anyhow::Result<u32> {
    let requested = local.or(global);
    if requested == Some(0) {
        return Err(CoreError::Validation("limit must be at least 1".into()).into());
    }
    Ok(general.clamp_limit(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general() -> GeneralConfig {
        GeneralConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }

    #[test]
    fn subcommand_limit_wins_over_global() {
        assert_eq!(effective_limit(Some(5), Some(10), &general()).unwrap(), 5);
        assert_eq!(effective_limit(None, Some(10), &general()).unwrap(), 10);
        assert_eq!(effective_limit(None, None, &general()).unwrap(), 20);
    }

    #[test]
    fn zero_is_rejected() {
        let err = effective_limit(Some(0), None, &general()).unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some());
    }

    #[test]
    fn huge_limits_are_capped() {
        assert_eq!(effective_limit(None, Some(u32::MAX), &general()).unwrap(), 100);
    }
}
