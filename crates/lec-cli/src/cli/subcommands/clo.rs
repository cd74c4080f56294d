use clap::Subcommand;

/// Course learning outcome commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CloCommands {
    /// Attach a learning outcome to a topic.
    Add {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        text: String,
        /// Bloom level; inferred from the leading verb when omitted.
        #[arg(long)]
        bloom: Option<String>,
    },
    /// List a topic's learning outcomes.
    List {
        #[arg(long)]
        topic: String,
    },
}
