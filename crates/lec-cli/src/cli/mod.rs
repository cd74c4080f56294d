use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// `lec`: record subjects, topics, generation tasks and material versions.
///
/// Every flag below is global and may appear before or after the subcommand.
#[derive(Debug, Parser)]
#[command(
    name = "lec",
    version,
    about = "Lectern - educational material tracking ledger"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Result rendering
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Cap on listed rows (overrides general.default_limit)
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding .lectern (searched upwards from the cwd when omitted)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{SubjectCommands, TaskCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "lec", "--format", "table", "--limit", "10", "--verbose", "stats",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["lec", "stats", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["lec", "-q", "-v", "stats"]).is_err());
    }

    #[test]
    fn subcommand_limit_is_separate_from_global() {
        let cli = Cli::try_parse_from(["lec", "subject", "list", "--limit", "3"])
            .expect("cli should parse");
        let Commands::Subject { action } = cli.command else {
            panic!("expected subject command");
        };
        assert!(matches!(action, SubjectCommands::List { limit: Some(3) }));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["lec", "--format", "xml", "stats"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn subject_create_takes_name() {
        let cli = Cli::try_parse_from(["lec", "subject", "create", "--name", "Organic Chemistry"])
            .expect("cli should parse");
        let Commands::Subject { action } = cli.command else {
            panic!("expected subject command");
        };
        assert!(
            matches!(action, SubjectCommands::Create { ref name, .. } if name == "Organic Chemistry")
        );
    }

    #[test]
    fn task_status_takes_positional_id_and_status() {
        let cli = Cli::try_parse_from([
            "lec",
            "task",
            "status",
            "tsk-00000001",
            "completed",
            "--path",
            "out/notes.pdf",
        ])
        .expect("cli should parse");
        let Commands::Task { action } = cli.command else {
            panic!("expected task command");
        };
        let TaskCommands::Status {
            id, status, path, ..
        } = action
        else {
            panic!("expected task status");
        };
        assert_eq!(id, "tsk-00000001");
        assert_eq!(status, "completed");
        assert_eq!(path.as_deref(), Some("out/notes.pdf"));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["lec", "--project", "/tmp/demo", "stats"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
