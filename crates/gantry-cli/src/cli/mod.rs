//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here and nowhere else.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "gantry",
    bin_name = "gantry",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Deterministic project scaffolding from typed generation modules",
    long_about = "Gantry renders a project from template trees. Each enabled service \
                  in the main config owns one module config and one template tree; \
                  modules run in a fixed order and share script commands through a registrar.",
    after_help = "EXAMPLES:\n\
        \x20 gantry validate\n\
        \x20 gantry generate\n\
        \x20 gantry generate --dry-run -c ./configs/gantry.yml\n\
        \x20 gantry completions bash > /usr/share/bash-completion/completions/gantry",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the project described by the main config.
    #[command(
        visible_alias = "gen",
        about = "Generate the project",
        after_help = "EXAMPLES:\n\
            \x20 gantry generate\n\
            \x20 gantry generate --dry-run\n\
            \x20 GANTRY_TARGET_PATH=/tmp/out gantry generate"
    )]
    Generate(GenerateArgs),

    /// Load and validate every config without writing anything.
    #[command(
        about = "Validate the configuration",
        after_help = "EXAMPLES:\n\
            \x20 gantry validate\n\
            \x20 gantry validate --output-format json"
    )]
    Validate,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 gantry completions bash > ~/.local/share/bash-completion/completions/gantry\n\
            \x20 gantry completions zsh  > ~/.zfunc/_gantry\n\
            \x20 gantry completions fish > ~/.config/fish/completions/gantry.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Render in memory and list the files instead of writing them.
    #[arg(long = "dry-run", help = "List the files that would be written")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_dry_run() {
        let cli = Cli::parse_from(["gantry", "generate", "--dry-run"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert!(args.dry_run);
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["gantry", "gen"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::parse_from(["gantry", "validate", "-c", "other.yml"]);
        assert!(matches!(cli.command, Commands::Validate));
        assert_eq!(
            cli.global.config.as_deref(),
            Some(std::path::Path::new("other.yml"))
        );
    }

    #[test]
    fn completions_shell_names() {
        let cli = Cli::parse_from(["gantry", "completions", "powershell"]);
        let Commands::Completions(args) = cli.command else {
            panic!("expected Completions command");
        };
        assert_eq!(args.shell, Shell::PowerShell);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["gantry", "--quiet", "--verbose", "validate"]);
        assert!(result.is_err());
    }
}
