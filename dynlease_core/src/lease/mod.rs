pub mod line;
pub mod parser;
pub mod table;
pub mod time;

// Reexport
pub use parser::{LeaseParser, ParserState};
pub use table::{Commit, LeaseTable};
pub use time::{display_dhcp_time, parse_dhcp_time};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/*
* A closed `lease <ip> { ... }` block.
*/
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaseRecord {
    pub ip: String,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub starts: Timestamp,
    pub ends: Timestamp,
}
impl LeaseRecord {
    /// Leases without a hardware address can't be turned into static hosts.
    pub fn has_mac(&self) -> bool {
        self.mac.as_deref().is_some_and(|mac| !mac.is_empty())
    }
    pub fn is_active(&self, now: &Timestamp) -> bool {
        self.ends >= *now
    }
}

/*
* A block still being read.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLease {
    pub ip: String,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub starts: Option<Timestamp>,
    pub ends: Option<Timestamp>,
}
impl PendingLease {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_owned(),
            ..Default::default()
        }
    }
    /// Close the block.
    /// Fails with the name of the first missing timestamp.
    pub fn finish(self) -> Result<LeaseRecord, &'static str> {
        let starts = self.starts.ok_or("starts")?;
        let ends = self.ends.ok_or("ends")?;
        Ok(LeaseRecord {
            ip: self.ip,
            mac: self.mac,
            name: self.name,
            starts,
            ends,
        })
    }
}
