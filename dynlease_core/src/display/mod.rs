pub mod utils;
use utils::{display_optional, display_until};

use crate::lease::{LeaseRecord, LeaseTable};

use clap::ValueEnum;
use jiff::Timestamp;
use owo_colors::OwoColorize;
use std::fmt;
use tabled::{settings::Style, Table, Tabled};

// Error Handling
use dynlease_error::DynleaseError;

/// Report layouts.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum Format {
    /// Tab separated: ip, mac, "until", ends, name.
    #[default]
    Tsv,
    /// Human readable table.
    Table,
    /// Array of lease objects.
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State {
    Active,
    Expired,
}
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let res = match self {
            State::Active => "active".green().to_string(),
            State::Expired => "expired".red().to_string(),
        };
        write!(f, "{}", res)
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct LeaseRow {
    pub ip: String,
    pub mac: String,
    pub until: String,
    pub name: String,
    pub state: State,
}
impl LeaseRow {
    pub fn new(lease: &LeaseRecord, now: &Timestamp) -> Self {
        let state = match lease.is_active(now) {
            true => State::Active,
            false => State::Expired,
        };
        Self {
            ip: lease.ip.clone(),
            mac: display_optional(&lease.mac),
            until: display_until(&lease.ends),
            name: display_optional(&lease.name),
            state,
        }
    }
}

/**
* Render the leases that carry a hardware address.
*/
pub fn render(table: &LeaseTable, format: Format, now: &Timestamp) -> Result<String, DynleaseError> {
    let res = match format {
        Format::Tsv => tsv(table),
        Format::Table => pretty(table, now),
        Format::Json => json(table)?,
    };
    Ok(res)
}

/// One line per lease: `ip\tmac\tuntil\tends\tname`.
pub fn tsv(table: &LeaseTable) -> String {
    table
        .reportable()
        .map(|e| {
            format!(
                "{}\t{}\tuntil\t{}\t{}\n",
                e.ip,
                display_optional(&e.mac),
                display_until(&e.ends),
                display_optional(&e.name)
            )
        })
        .collect()
}

pub fn pretty(table: &LeaseTable, now: &Timestamp) -> String {
    let rows: Vec<LeaseRow> = table.reportable().map(|e| LeaseRow::new(e, now)).collect();
    let mut res = Table::new(&rows);
    res.with(Style::rounded());
    format!("{}\n", res)
}

pub fn json(table: &LeaseTable) -> Result<String, DynleaseError> {
    let leases: Vec<&LeaseRecord> = table.reportable().collect();
    let res = serde_json::to_string_pretty(&leases)?;
    Ok(format!("{}\n", res))
}
