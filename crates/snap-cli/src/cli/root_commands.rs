use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize docsnaps for a project.
    Init(InitArgs),
    /// Install a plugin module from its manifest.
    Install(InstallArgs),
    /// Re-apply a changed manifest to an installed module.
    Update(UpdateArgs),
    /// Remove an installed module.
    Uninstall(UninstallArgs),
    /// Fetch enabled jobs and save changed snapshots.
    Run(RunArgs),
    /// List snapshot jobs.
    List(ListArgs),
    /// List installed modules.
    Modules,
    /// Show the snapshot history of a job.
    History(HistoryArgs),
    /// Print the text of a stored snapshot.
    Show(SnapshotArgs),
    /// Enable a snapshot job.
    Enable(JobArgs),
    /// Disable a snapshot job.
    Disable(JobArgs),
    /// Print the JSON schema of a docsnaps type.
    Schema(SchemaArgs),
}

/// Arguments for `docsnaps init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,
}

/// Arguments for `docsnaps install`.
#[derive(Clone, Debug, Args)]
pub struct InstallArgs {
    /// Path to the module manifest (TOML)
    pub manifest: PathBuf,
    /// Create every job disabled
    #[arg(long)]
    pub disabled: bool,
}

/// Arguments for `docsnaps update`.
#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Path to the module manifest (TOML)
    pub manifest: PathBuf,
}

/// Arguments for `docsnaps uninstall`.
#[derive(Clone, Debug, Args)]
pub struct UninstallArgs {
    /// Module name as declared in its manifest
    pub module: String,
    /// Also delete snapshots of the module's jobs
    #[arg(long)]
    pub purge: bool,
}

/// Arguments for `docsnaps run`.
#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Only run these job ids (repeatable)
    #[arg(long = "job", value_name = "ID")]
    pub jobs: Vec<i64>,
    /// Fetch, transform and compare without saving snapshots
    #[arg(long)]
    pub dry_run: bool,
    /// Exit non-zero when any job failed
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Arguments for `docsnaps list`.
#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Only jobs installed by this module
    #[arg(long)]
    pub module: Option<String>,
    /// Only enabled jobs
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,
    /// Only disabled jobs
    #[arg(long)]
    pub disabled: bool,
}

/// Arguments for `docsnaps history`.
#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    pub job_id: i64,
}

/// Arguments for `docsnaps show`.
#[derive(Clone, Debug, Args)]
pub struct SnapshotArgs {
    pub snapshot_id: i64,
}

/// Arguments for `docsnaps enable` and `docsnaps disable`.
#[derive(Clone, Debug, Args)]
pub struct JobArgs {
    pub job_id: i64,
}

/// Arguments for `docsnaps schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

/// Types whose JSON schema can be printed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Manifest,
    InstallReport,
    UninstallReport,
    RunReport,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Commands, SchemaType};
    use crate::cli::Cli;

    #[test]
    fn run_accepts_repeated_job_ids() {
        let cli = Cli::try_parse_from(["docsnaps", "run", "--job", "3", "--job", "7", "--dry-run"])
            .expect("cli should parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.jobs, vec![3, 7]);
        assert!(args.dry_run);
        assert!(!args.fail_on_error);
    }

    #[test]
    fn install_takes_manifest_path_and_disabled_flag() {
        let cli = Cli::try_parse_from(["docsnaps", "install", "acme.toml", "--disabled"])
            .expect("cli should parse");
        let Commands::Install(args) = cli.command else {
            panic!("expected install command");
        };
        assert_eq!(args.manifest.to_str(), Some("acme.toml"));
        assert!(args.disabled);
    }

    #[test]
    fn uninstall_purge_defaults_off() {
        let cli = Cli::try_parse_from(["docsnaps", "uninstall", "acme.legal"])
            .expect("cli should parse");
        let Commands::Uninstall(args) = cli.command else {
            panic!("expected uninstall command");
        };
        assert_eq!(args.module, "acme.legal");
        assert!(!args.purge);
    }

    #[test]
    fn list_rejects_enabled_with_disabled() {
        let parsed = Cli::try_parse_from(["docsnaps", "list", "--enabled", "--disabled"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn history_uses_global_limit() {
        let cli = Cli::try_parse_from(["docsnaps", "history", "4", "--limit", "5"])
            .expect("cli should parse");
        assert_eq!(cli.limit, Some(5));
        assert!(matches!(cli.command, Commands::History(args) if args.job_id == 4));
    }

    #[test]
    fn schema_type_is_kebab_case() {
        let cli = Cli::try_parse_from(["docsnaps", "schema", "run-report"])
            .expect("cli should parse");
        assert!(
            matches!(cli.command, Commands::Schema(args) if args.type_name == SchemaType::RunReport)
        );
    }
}
