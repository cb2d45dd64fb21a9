use clap::Parser;
use dedup::AppConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dedup")]
#[command(
    about = "Remove duplicate files from target directories, also deleting all copies \
             from the target directories of any file that exists in any read-only directory",
    long_about = None
)]
pub struct Cli {
    /// Directory from which to remove duplicate files
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Directory to search for existing files; may be given more than once
    #[arg(short = 'r', long = "read-only", value_name = "DIR")]
    pub read_only: Vec<String>,

    /// Do not confirm deletion
    #[arg(short, long)]
    pub yes: bool,

    /// Display more information
    #[arg(short, long)]
    pub verbose: bool,

    /// Remove empty target directories after deduplication
    #[arg(short = 'e', long)]
    pub remove_empty_dirs: bool,

    /// Print a summary report
    #[arg(short, long)]
    pub print_report: bool,

    /// Configuration file to read instead of Dedup.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer the command line over loaded configuration: targets replace, read-only
    /// directories append, flags can only switch behavior on.
    pub fn merge_into(self, mut config: AppConfig) -> AppConfig {
        if !self.targets.is_empty() {
            config.target_dirs = self.targets;
        }
        config.read_only_dirs.extend(self.read_only);
        config.yes |= self.yes;
        config.verbose |= self.verbose;
        config.remove_empty_dirs |= self.remove_empty_dirs;
        config.print_report |= self.print_report;
        config
    }
}
