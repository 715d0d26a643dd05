use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "flv-inspect",
    version,
    about = "Inspect the structure of an FLV file",
    long_about = "Validates the header and every tag of an FLV file, then prints the header, \
                  a summary of audio/video tags and the metadata carried in script tags."
)]
pub struct Args {
    /// FLV file to inspect
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,

    /// Print one line per video tag and enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not print metadata
    #[arg(long)]
    pub no_metadata: bool,
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_file_is_required() {
        assert!(Args::try_parse_from(["flv-inspect"]).is_err());

        let args = Args::try_parse_from(["flv-inspect", "-f", "in.flv", "--no-metadata"]).unwrap();
        assert_eq!(args.file, PathBuf::from("in.flv"));
        assert!(args.no_metadata);
        assert!(!args.verbose);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["flv-inspect", "-f", "a.flv", "-v", "-q"]).is_err());
    }
}
