// SPDX-License-Identifier: GPL-3.0-or-later

use comp2proj::{args, config, context, modes};
use std::env;
use std::process::ExitCode;

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Parse the command line arguments, the verbosity sets the log level.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;

    // Initialize the logging system. The `RUST_LOG` variable wins when set.
    let filter = match arguments.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Get the package name and version from Cargo
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");
    let os = env::consts::OS;
    let family = env::consts::FAMILY;
    let arch = env::consts::ARCH;
    log::info!("Running on... {family}/{os} {arch}");
    log::info!("{arguments}");

    // Prepare the application, startup problems are fatal.
    let application = match configure(arguments) {
        Ok(application) => application,
        Err(error) => {
            log::error!("comp2proj: {error}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Run the application.
    log::debug!("Configuration complete, reading the build log now...");
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}

/// Capture the context, load the configuration and select the mode.
fn configure(arguments: args::Arguments) -> anyhow::Result<modes::Mode> {
    let context = context::Context::capture()?;
    log::info!("{context}");
    let configuration = config::Loader::load(&context, &arguments.config)?;
    log::info!("{configuration}");

    Ok(modes::Mode::configure(context, arguments, configuration)?)
}
