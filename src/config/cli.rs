use crate::config::HarvestConfig;
use crate::repositories::Repository;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "repo-harvest")]
#[command(about = "Collect an institution's dataset identifiers from research data repositories")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "harvest.toml")]
    pub config: String,

    /// Write CSV files here instead of the configured directory
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Run only these repositories (comma-separated, e.g. datacite,gbif)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<Repository>,

    /// Show which repositories would run and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress counters
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn apply_overrides(&self, config: &mut HarvestConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_only_list() {
        let args = CliArgs::parse_from(["repo-harvest", "--only", "datacite,gbif", "-q"]);
        assert_eq!(args.only, vec![Repository::DataCite, Repository::Gbif]);
        assert!(args.quiet);
        assert_eq!(args.config, "harvest.toml");
    }

    #[test]
    fn test_output_dir_override() {
        let args = CliArgs::parse_from(["repo-harvest", "-o", "/tmp/out"]);
        let mut config = HarvestConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.output_directory(), "/tmp/out");
    }
}
