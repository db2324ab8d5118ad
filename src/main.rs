use clap::error::ErrorKind;
use pim_cli::{
    cli::execute_command,
    commands::{create_cli_commands, params::PARAMETER_VERBOSE},
    exit_codes::PimExitCode,
};
use tracing_subscriber::EnvFilter;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let commands = match create_cli_commands() {
        Ok(commands) => commands,
        Err(e) => {
            // help and version are reported through the error path too
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => PimExitCode::Success,
                _ => PimExitCode::UsageError,
            };
            let _ = e.print();
            ::std::process::exit(code.code());
        }
    };

    // Initialize the logging subsystem. Logs go to stderr so that stdout
    // only carries command output.
    let filter = if commands.get_flag(PARAMETER_VERBOSE) {
        EnvFilter::new("pim_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(&commands).await {
        match e.api_error_kind() {
            Some(kind) => color_print::ceprintln!("<r>ERROR:</r> [{}] {}", kind, e),
            None => color_print::ceprintln!("<r>ERROR:</r> {}", e),
        }
        ::std::process::exit(e.exit_code().code());
    }
}
