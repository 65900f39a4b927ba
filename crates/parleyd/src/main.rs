use std::process::ExitCode;
use std::sync::Arc;

use parley_config::Config;
use parleyd::ArithmeticCommands;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        // Prints help/version or the usage error and exits with the
        // conventional status.
        Err(error) => error.exit(),
    };

    match parleyd::run(config, Arc::new(ArithmeticCommands::new())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: "parleyd", error = %error, "daemon terminated");
            ExitCode::FAILURE
        }
    }
}
