//! `dotfiles-bootstrap` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser as _;

use dotfiles_bootstrap::cli::{self, Cli};
use dotfiles_bootstrap::commands;
use dotfiles_bootstrap::error::exit_code;
use dotfiles_bootstrap::exec::SystemExecutor;
use dotfiles_bootstrap::logging::{self, Log as _, Logger};
use dotfiles_bootstrap::platform::Platform;

/// Exit status after an interrupt (128 + SIGINT).
const INTERRUPTED: i32 = 130;

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = u8::from(e.use_stderr());
            e.print().ok();
            return ExitCode::from(code);
        }
    };

    if args.help {
        #[allow(clippy::print_stdout)]
        print!("{}", cli::render_help(&Platform::detect(&SystemExecutor)));
        return ExitCode::SUCCESS;
    }

    let _ = enable_ansi_support::enable_ansi_support();
    logging::init_subscriber(args.verbose, "install");
    let log = Arc::new(Logger::new("install"));

    let handler_log = Arc::clone(&log);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_log.warn(
            "interrupted: the home directory and backup directory may be partially updated",
        );
        std::process::exit(INTERRUPTED);
    }) {
        log.debug(&format!("could not install interrupt handler: {e}"));
    }

    match commands::install::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(exit_code(&e))
        }
    }
}
