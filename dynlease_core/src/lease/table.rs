use super::{LeaseParser, LeaseRecord};
use crate::config::ParseOptions;

use jiff::Timestamp;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Error handling
use log::{debug, info, trace};
use miette::Error;
use dynlease_error::{DynleaseError, WrapError};

/// What happened to a closed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// First lease seen for this address.
    Stored,
    /// Replaced an older lease for this address.
    Replaced,
    /// Ended before the cutoff.
    Expired,
    /// A lease with a later `starts` is already stored.
    Superseded,
}

/**
The winning lease of every address, in order of first appearance.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseTable {
    records: Vec<LeaseRecord>,
    index: HashMap<String, usize>,
}

impl LeaseTable {
    pub fn from_file(path: &Path, options: &ParseOptions) -> Result<Self, DynleaseError> {
        info!("Read lease database {}", path.display());
        let file = match File::open(path) {
            Ok(v) => v,
            Err(e) => {
                let message = format!("Couldn't open lease file {:?}", path.display().to_string());
                let help = "Check the path and that you can read it, or point to another file with --file";
                let err = WrapError::builder()
                    .msg(&message)
                    .help(help)
                    .origin(Error::from_err(e))
                    .build();
                return Err(err.into());
            }
        };
        let origin = path.display().to_string();
        Self::from_reader(BufReader::new(file), &origin, options)
    }

    /// Stream a lease database, `origin` names it in error reports.
    pub fn from_reader<R: BufRead>(
        reader: R,
        origin: &str,
        options: &ParseOptions,
    ) -> Result<Self, DynleaseError> {
        let mut parser = LeaseParser::new(origin, options)?;
        for line in reader.lines() {
            parser.feed(&line?)?;
        }
        let table = parser.finish();
        info!("Found {} leases in {}", table.len(), origin);
        Ok(table)
    }

    /// Keep the record unless it expired before `cutoff`
    /// or a lease with a later start is already known for its address.
    pub fn commit(&mut self, record: LeaseRecord, cutoff: &Timestamp) -> Commit {
        if record.ends < *cutoff {
            debug!("Drop lease {}, ended {}", record.ip, record.ends);
            return Commit::Expired;
        }
        match self.index.get(&record.ip) {
            Some(&i) => {
                if self.records[i].starts > record.starts {
                    debug!("Drop lease {}, superseded", record.ip);
                    return Commit::Superseded;
                }
                trace!("Replace lease {}", record.ip);
                self.records[i] = record;
                Commit::Replaced
            }
            None => {
                trace!("Store lease {}", record.ip);
                self.index.insert(record.ip.clone(), self.records.len());
                self.records.push(record);
                Commit::Stored
            }
        }
    }

    pub fn get(&self, ip: &str) -> Option<&LeaseRecord> {
        self.index.get(ip).map(|&i| &self.records[i])
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &LeaseRecord> {
        self.records.iter()
    }
    /// Leases worth migrating: the ones with a hardware address.
    pub fn reportable(&self) -> impl Iterator<Item = &LeaseRecord> {
        self.records.iter().filter(|e| e.has_mac())
    }
}
