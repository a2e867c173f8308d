use dynlease_core::cli::Cli;

// Error Handling
use log::trace;
use miette::Result;

/**
The binary entrypoint.
Prints the lease report, or a diagnostic and a non-zero exit code.
*/
fn main() -> Result<()> {
    make_handler()?;
    Cli::run()?;
    trace!("Process clean exit.");
    Ok(())
}

/**
The make handler functions is executed right after the main function
to set up a verbose and colorful error/panic handler.
*/
pub fn make_handler() -> Result<()> {
    miette::set_panic_hook();
    Ok(())
}
