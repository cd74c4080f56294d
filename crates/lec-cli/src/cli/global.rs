use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Aligned columns.
    Table,
    /// Compact JSON, one document per line.
    Raw,
}

/// The subset of top-level flags that command handlers read.
///
/// `--quiet` and `--verbose` only steer logging and stay in `main`.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub project: Option<String>,
}
