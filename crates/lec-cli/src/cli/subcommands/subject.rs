use clap::Subcommand;

/// Subject commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SubjectCommands {
    /// Register a subject.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get a subject by ID or slug.
    Get { subject: String },
    /// List subjects.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Rename a subject or change its description.
    Update {
        subject: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a subject and everything under it.
    Delete { subject: String },
    /// Topic, material and open-task counts for a subject.
    Stats { subject: String },
}
