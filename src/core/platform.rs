//! Process-level entry helpers and error handling.

/// Report a failed run and exit with code 1.
pub fn handle_error(error: anyhow::Error) {
    eprintln!();
    eprintln!("Error running smufl-builder:");
    // Show the whole context chain, outermost first
    for (i, cause) in error.chain().enumerate() {
        if i == 0 {
            eprintln!("{cause}");
        } else {
            eprintln!("  caused by: {cause}");
        }
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate command line arguments.
pub fn get_cli_args() -> anyhow::Result<crate::core::cli::CliArgs> {
    use clap::Parser;
    let args = crate::core::cli::CliArgs::parse();
    args.validate().map_err(anyhow::Error::msg)?;
    Ok(args)
}
