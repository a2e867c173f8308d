use crate::config::{DEFAULT_EXPIRED_MINUTES, LEASES_FILE};
use crate::display::Format;
use crate::lease::parse_dhcp_time;

use clap::{Parser, ValueHint};
use clap_verbosity_flag::Verbosity;
use jiff::Timestamp;
use std::path::PathBuf;

/// List dynamic DHCP leases, so that you can find dynamic hosts
/// and migrate them to static addresses.
#[derive(Debug, Parser)]
#[command(name = "dynlease", version, long_about = None)]
pub struct Cli {
    /// In addition to current leases, show leases that expired
    /// within the given number of minutes in the past.
    #[arg(
        long,
        value_name = "MINUTES",
        default_value_t = DEFAULT_EXPIRED_MINUTES,
        allow_negative_numbers = true
    )]
    pub expired: f64,

    /// The dhcpd lease database to read.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value = LEASES_FILE)]
    pub file: PathBuf,

    /// Report layout.
    #[arg(long, value_enum, default_value_t = Format::Tsv)]
    pub format: Format,

    /// Compare leases against this UTC time (YYYY/MM/DD HH:MM:SS) instead of now.
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_dhcp_time, hide = true)]
    pub now: Option<Timestamp>,

    #[command(flatten)]
    pub verbose: Verbosity,
}
