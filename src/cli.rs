use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every collection task scheduled for the current reference-clock hour
    Schedule,

    /// Collect one city now
    Collect {
        /// City code (la, den, ny, chi, mia, aus, phil)
        #[arg(long)]
        city: String,

        /// Target tomorrow's settlement day instead of today's
        #[arg(long)]
        tomorrow: bool,

        /// Fetch and print the record without touching the log file
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_means_scheduled_run() {
        let cli = Cli::parse_from(["fahrenheit"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn collect_flags_parse() {
        let cli = Cli::parse_from([
            "fahrenheit", "collect", "--city", "den", "--tomorrow", "--dry-run",
        ]);
        match cli.command {
            Some(Commands::Collect { city, tomorrow, dry_run }) => {
                assert_eq!(city, "den");
                assert!(tomorrow);
                assert!(dry_run);
            }
            _ => panic!("expected collect subcommand"),
        }
    }
}
