// Command-line surface: `up FILE...`. `--help` is the only flag.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "up", about = "Upload files and print their URLs.")]
pub struct Cli {
    /// Files to upload
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn keeps_file_order() {
        let cli = Cli::try_parse_from(["up", "b.txt", "a.txt", "b.txt"]).unwrap();
        assert_eq!(
            cli.files,
            [PathBuf::from("b.txt"), PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );
    }

    #[test]
    fn help_is_the_only_flag() {
        assert!(Cli::try_parse_from(["up", "--version", "a.txt"]).is_err());
        let help = Cli::try_parse_from(["up", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["up"]).is_err());
    }
}
