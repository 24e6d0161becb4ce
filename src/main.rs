//! Main entry point for securepass.

use clap::Parser;
use securepass::cli::Cli;
use securepass::utils::error_exit;

#[tokio::main]
async fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        error_exit(&e.to_string(), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test that CLI can be parsed without panicking
        let cli = Cli::try_parse_from(["securepass", "list"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["securepass", "generate", "--length", "32"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["securepass", "strength", "hunter2"]);
        assert!(cli.is_ok());
    }
}
