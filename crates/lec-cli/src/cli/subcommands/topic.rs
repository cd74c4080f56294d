use clap::Subcommand;

/// Topic commands.
///
/// `TOPIC` arguments accept a topic ID or `SUBJECT-SLUG/TOPIC-SLUG`.
#[derive(Clone, Debug, Subcommand)]
pub enum TopicCommands {
    /// Register a topic in a subject.
    Create {
        /// Subject ID or slug.
        #[arg(long)]
        subject: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get a topic.
    Get { topic: String },
    /// List the topics of a subject.
    List {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Rename a topic or change its description.
    Update {
        topic: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a topic with its materials, tasks and outcomes.
    Delete { topic: String },
}
