//! CLI argument parsing

use clap::Parser;

/// Build the songplay star schema from raw song and event logs
///
/// Reads `config/etl.yaml` from the working directory. Set `RUST_LOG` to
/// change log verbosity.
#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_accepted() {
        assert!(Cli::try_parse_from(["songplay-etl"]).is_ok());
        assert!(Cli::try_parse_from(["songplay-etl", "--output", "x"]).is_err());
        assert!(Cli::try_parse_from(["songplay-etl", "extra"]).is_err());
    }
}
