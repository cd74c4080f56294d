use clap::Subcommand;

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Queue a generation task.
    Create {
        /// Topic ID or `SUBJECT-SLUG/TOPIC-SLUG`.
        #[arg(long)]
        topic: String,
        /// notes, quiz or presentation
        #[arg(long)]
        kind: String,
        /// Opaque generation parameters as a JSON object.
        #[arg(long)]
        params: Option<String>,
    },
    /// Get a task by ID.
    Get { id: String },
    /// List tasks, newest first.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Open backlog (pending and in progress), oldest first.
    Pending,
    /// Move a task to a new status.
    Status {
        id: String,
        /// pending, in_progress, completed or failed
        status: String,
        /// Storage path of the produced file (required for completed).
        #[arg(long)]
        path: Option<String>,
        /// File format of the produced file (pdf, md, docx, pptx).
        #[arg(long)]
        file_format: Option<String>,
        /// Failure detail (for failed).
        #[arg(long)]
        error: Option<String>,
    },
}
