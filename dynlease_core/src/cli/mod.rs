mod types;
pub mod utils;
pub use types::*;

use crate::config::ParseOptions;
use crate::display;
use crate::lease::LeaseTable;

use clap::Parser;

// Error Handling
use dynlease_error::DynleaseError;
use log::trace;
use miette::Result;

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        utils::set_logger(&cli);
        Self::switch(cli)?;
        Ok(())
    }
    pub fn switch(cli: Cli) -> Result<()> {
        let report = cli.report()?;
        print!("{}", report);
        Ok(())
    }
    /// Read the lease database and render the report.
    /// Nothing is printed when the file doesn't parse.
    pub fn report(&self) -> Result<String, DynleaseError> {
        let options = ParseOptions::builder()
            .delta(ParseOptions::delta_from_minutes(self.expired)?)
            .maybe_now(self.now)
            .build();
        trace!("{:?}", options);
        let table = LeaseTable::from_file(&self.file, &options)?;
        display::render(&table, self.format, &options.now)
    }
}
