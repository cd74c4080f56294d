use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CloCommands, MaterialCommands, SubjectCommands, TaskCommands, TopicCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Subjects.
    Subject {
        #[command(subcommand)]
        action: SubjectCommands,
    },
    /// Topics within a subject.
    Topic {
        #[command(subcommand)]
        action: TopicCommands,
    },
    /// Generation tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Produced materials and their versions.
    Material {
        #[command(subcommand)]
        action: MaterialCommands,
    },
    /// Course learning outcomes.
    Clo {
        #[command(subcommand)]
        action: CloCommands,
    },
    /// Ledger-wide task statistics.
    Stats,
    /// Show the slug a name would register under.
    Sanitize(SanitizeArgs),
    /// Query the audit trail.
    Audit(AuditArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SanitizeArgs {
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
}
