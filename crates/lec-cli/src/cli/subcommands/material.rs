use clap::Subcommand;

/// Material commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MaterialCommands {
    /// Get a material by ID, or the current one for a topic and kind.
    Get {
        id: Option<String>,
        #[arg(long, requires = "kind", conflicts_with = "id")]
        topic: Option<String>,
        #[arg(long, requires = "topic")]
        kind: Option<String>,
    },
    /// List materials.
    List {
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Every recorded version of a material.
    History { id: String },
}
