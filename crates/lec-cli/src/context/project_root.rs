use std::path::{Path, PathBuf};

use anyhow::Context;
use lec_config::PROJECT_DIR;
use lec_core::errors::CoreError;

/// Walk upwards from `start` until a `.lectern` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolve the project root from `--project` or the working directory.
///
/// Without an existing `.lectern` directory the working directory becomes the
/// root; the ledger is created there on first use.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.lectern' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        return Err(CoreError::Validation(format!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        ))
        .into());
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(PROJECT_DIR)).expect(".lectern should create");
        std::fs::create_dir_all(temp.path().join("a/b/c")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("a/b/c"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("nested dirs should create");
        assert!(find_project_root(&temp.path().join("a/b")).is_none());
    }

    #[test]
    fn explicit_lectern_dir_resolves_to_parent() {
        let temp = TempDir::new().expect("tempdir should create");
        let lectern = temp.path().join(PROJECT_DIR);
        let root = resolve_project_root(lectern.to_str()).expect("should resolve");
        assert_eq!(root, temp.path());
    }

    #[test]
    fn explicit_missing_dir_is_an_error() {
        let temp = TempDir::new().expect("tempdir should create");
        let missing = temp.path().join("nope");
        assert!(resolve_project_root(missing.to_str()).is_err());
    }
}
