//! CLI argument parsing for pdfbind.

use clap::Parser;
use std::path::PathBuf;

/// Merge PDF and image files into a single PDF from a JSON manifest.
#[derive(Parser, Debug)]
#[command(name = "pdfbind")]
#[command(version)]
#[command(about = "Merge PDF and image files into a single PDF", long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Path for the output PDF
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Overwrite an existing output file without prompting
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite; fail if the output file already exists
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_paths() {
        let cli = Cli::parse_from(["pdfbind", "config.json", "out.pdf"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.output, PathBuf::from("out.pdf"));
        assert!(!cli.debug);
        assert!(!cli.quiet);
        assert!(!cli.force);
        assert!(!cli.no_clobber);
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["pdfbind", "config.json", "out.pdf", "--debug", "--force"]);
        assert!(cli.debug);
        assert!(cli.force);
    }

    #[test]
    fn force_and_no_clobber_conflict() {
        let result =
            Cli::try_parse_from(["pdfbind", "config.json", "out.pdf", "--force", "--no-clobber"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_positionals_fail() {
        assert!(Cli::try_parse_from(["pdfbind", "config.json"]).is_err());
    }
}
