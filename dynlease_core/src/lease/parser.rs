use super::line::{span_of, span_of_line, unquote, Statement};
use super::{parse_dhcp_time, Commit, LeaseTable, PendingLease};
use crate::config::ParseOptions;

use jiff::Timestamp;
use miette::NamedSource;
use std::mem;

// Error handling
use dynlease_error::{DynleaseError, LeaseParseError};
use log::{trace, warn};

/// Where the parser stands between two lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    /// Looking for the next `lease <ip> {`.
    #[default]
    Idle,
    /// Inside a block, owning the lease read so far.
    InBlock(PendingLease),
}

/**
Line by line reader of an ISC dhcpd lease database.

Blocks are committed to the table as soon as they close,
a malformed block aborts the whole read.
*/
#[derive(Debug)]
pub struct LeaseParser {
    origin: String,
    cutoff: Timestamp,
    state: ParserState,
    table: LeaseTable,
    line: usize,
}

impl LeaseParser {
    pub fn new(origin: &str, options: &ParseOptions) -> Result<Self, DynleaseError> {
        Ok(Self {
            origin: origin.to_owned(),
            cutoff: options.cutoff()?,
            state: ParserState::Idle,
            table: LeaseTable::default(),
            line: 0,
        })
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn feed(&mut self, raw: &str) -> Result<(), DynleaseError> {
        self.line += 1;
        let statement = Statement::parse(raw);
        let state = mem::take(&mut self.state);
        self.state = match state {
            ParserState::Idle => self.idle(raw, statement)?,
            ParserState::InBlock(lease) => self.in_block(lease, raw, statement)?,
        };
        Ok(())
    }

    /// Hand over the table.
    /// A block left open at end of input is not committed.
    pub fn finish(self) -> LeaseTable {
        if let ParserState::InBlock(lease) = &self.state {
            warn!(
                "Lease {} is not closed at end of {}, ignoring it",
                lease.ip, self.origin
            );
        }
        self.table
    }

    fn idle(&self, raw: &str, statement: Statement) -> Result<ParserState, DynleaseError> {
        let state = match statement {
            Statement::Lease { ip: Some(ip) } => ParserState::InBlock(PendingLease::new(ip)),
            Statement::Lease { ip: None } => {
                return Err(self.missing_value(raw, "lease", "Expected `lease <ip> {`."));
            }
            _ => ParserState::Idle,
        };
        Ok(state)
    }

    fn in_block(
        &mut self,
        mut lease: PendingLease,
        raw: &str,
        statement: Statement,
    ) -> Result<ParserState, DynleaseError> {
        match statement {
            Statement::Starts { time } => {
                lease.starts = Some(self.timestamp(&lease, "starts", raw, &time)?);
            }
            Statement::Ends { time } => {
                lease.ends = Some(self.timestamp(&lease, "ends", raw, &time)?);
            }
            Statement::Hardware { mac: Some(mac) } => {
                lease.mac = Some(mac.to_owned());
            }
            Statement::Hardware { mac: None } => {
                return Err(self.missing_value(raw, "hardware", "Expected `hardware <type> <address>`."));
            }
            Statement::ClientHostname { name: Some(name) } => {
                lease.name = Some(unquote(name).to_owned());
            }
            Statement::ClientHostname { name: None } => {
                return Err(self.missing_value(raw, "client-hostname", "Expected `client-hostname \"<name>\"`."));
            }
            Statement::VendorClassIdentifier { value } => {
                if lease.name.is_none() {
                    lease.name = Some(unquote(&value.join(" ")).to_owned());
                }
            }
            Statement::Close => {
                self.commit(lease, raw)?;
                return Ok(ParserState::Idle);
            }
            Statement::Blank | Statement::Lease { .. } | Statement::Other => {}
        };
        Ok(ParserState::InBlock(lease))
    }

    fn commit(&mut self, lease: PendingLease, raw: &str) -> Result<Commit, DynleaseError> {
        let ip = lease.ip.clone();
        let record = match lease.finish() {
            Ok(v) => v,
            Err(field) => {
                let err = LeaseParseError::IncompleteBlock {
                    ip,
                    field,
                    line: self.line,
                    src: self.source(raw),
                    span: span_of_line(raw),
                };
                return Err(err.into());
            }
        };
        let res = self.table.commit(record, &self.cutoff);
        trace!("Lease {} closed at line {}: {:?}", ip, self.line, res);
        Ok(res)
    }

    fn timestamp(
        &self,
        lease: &PendingLease,
        field: &'static str,
        raw: &str,
        time: &[&str],
    ) -> Result<Timestamp, DynleaseError> {
        match parse_dhcp_time(&time.join(" ")) {
            Ok(v) => Ok(v),
            Err(e) => {
                let err = LeaseParseError::MalformedTimestamp {
                    ip: lease.ip.clone(),
                    field,
                    line: self.line,
                    origin: e,
                    src: self.source(raw),
                    span: span_of(raw, time),
                };
                Err(err.into())
            }
        }
    }

    fn missing_value(&self, raw: &str, keyword: &str, help: &str) -> DynleaseError {
        LeaseParseError::MalformedLine {
            keyword: keyword.to_owned(),
            line: self.line,
            help: help.to_owned(),
            src: self.source(raw),
            span: span_of(raw, &[]),
        }
        .into()
    }

    fn source(&self, raw: &str) -> NamedSource<String> {
        NamedSource::new(format!("{}:{}", self.origin, self.line), raw.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lease::LeaseRecord;
    use jiff::SignedDuration;
    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const NOW: &str = "2024/03/09 12:00:00";

    fn options(minutes: i64) -> ParseOptions {
        ParseOptions::builder()
            .delta(SignedDuration::from_mins(minutes))
            .now(parse_dhcp_time(NOW).unwrap())
            .build()
    }

    fn parse(text: &str, minutes: i64) -> Result<LeaseTable, DynleaseError> {
        LeaseTable::from_reader(Cursor::new(text), "dhcpd.leases", &options(minutes))
    }

    /// A lease block around `now`, offsets in minutes.
    fn block(ip: &str, starts: i64, ends: i64, body: &str) -> String {
        let now = parse_dhcp_time(NOW).unwrap();
        let at = |offset: i64| {
            let ts = now.checked_add(SignedDuration::from_mins(offset)).unwrap();
            format!("3 {}", crate::lease::display_dhcp_time(&ts))
        };
        format!(
            "lease {ip} {{\n  starts {};\n  ends {};\n{body}}}\n",
            at(starts),
            at(ends)
        )
    }

    #[test]
    fn active_lease() -> Result<()> {
        let text = block(
            "10.0.0.5",
            -55,
            5,
            "  hardware ethernet aa:bb:cc:dd:ee:ff;\n  client-hostname \"host1\";\n",
        );
        let table = parse(&text, 60)?;
        let lease = table.get("10.0.0.5").unwrap();
        assert_eq!(lease.mac.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(lease.name.as_deref(), Some("host1"));
        assert_eq!(
            crate::lease::display_dhcp_time(&lease.ends),
            "2024/03/09 12:05:00"
        );
        Ok(())
    }

    #[test]
    fn later_start_wins_even_when_listed_first() -> Result<()> {
        let mut text = block(
            "10.0.0.5",
            -10,
            50,
            "  hardware ethernet aa:aa:aa:aa:aa:aa;\n  client-hostname \"new\";\n",
        );
        text += &block(
            "10.0.0.5",
            -30,
            90,
            "  hardware ethernet bb:bb:bb:bb:bb:bb;\n  client-hostname \"old\";\n",
        );
        let table = parse(&text, 60)?;
        assert_eq!(table.len(), 1);
        let lease = table.get("10.0.0.5").unwrap();
        assert_eq!(lease.mac.as_deref(), Some("aa:aa:aa:aa:aa:aa"));
        assert_eq!(lease.name.as_deref(), Some("new"));
        Ok(())
    }

    #[test]
    fn expiry_window() -> Result<()> {
        let text = block("10.0.0.5", -180, -120, "  hardware ethernet aa:aa:aa:aa:aa:aa;\n");
        assert!(parse(&text, 60)?.is_empty());
        assert_eq!(parse(&text, 180)?.len(), 1);
        Ok(())
    }

    #[test]
    fn expired_block_does_not_hide_older_qualifying_one() -> Result<()> {
        // The expired block is dropped before comparing start times.
        let mut text = block("10.0.0.5", -300, 600, "  hardware ethernet aa:aa:aa:aa:aa:aa;\n");
        text += &block("10.0.0.5", -200, -150, "  hardware ethernet bb:bb:bb:bb:bb:bb;\n");
        let table = parse(&text, 60)?;
        let lease = table.get("10.0.0.5").unwrap();
        assert_eq!(lease.mac.as_deref(), Some("aa:aa:aa:aa:aa:aa"));
        Ok(())
    }

    #[test]
    fn client_hostname_beats_vendor_class() -> Result<()> {
        let first = block(
            "10.0.0.5",
            -10,
            50,
            "  client-hostname \"laptop\";\n  set vendor-class-identifier = \"MSFT 5.0\";\n",
        );
        let last = block(
            "10.0.0.6",
            -10,
            50,
            "  set vendor-class-identifier = \"MSFT 5.0\";\n  client-hostname \"desktop\";\n",
        );
        let only = block(
            "10.0.0.7",
            -10,
            50,
            "  set vendor-class-identifier = \"android-dhcp-13\";\n",
        );
        let table = parse(&(first + &last + &only), 60)?;
        assert_eq!(table.get("10.0.0.5").unwrap().name.as_deref(), Some("laptop"));
        assert_eq!(table.get("10.0.0.6").unwrap().name.as_deref(), Some("desktop"));
        assert_eq!(
            table.get("10.0.0.7").unwrap().name.as_deref(),
            Some("android-dhcp-13")
        );
        Ok(())
    }

    #[test]
    fn vendor_class_keeps_spaces() -> Result<()> {
        let text = block(
            "10.0.0.5",
            -10,
            50,
            "  set vendor-class-identifier = \"MSFT 5.0\";\n",
        );
        let table = parse(&text, 60)?;
        assert_eq!(table.get("10.0.0.5").unwrap().name.as_deref(), Some("MSFT 5.0"));
        Ok(())
    }

    #[test]
    fn blank_and_comment_lines_are_noops() -> Result<()> {
        let text = "# The format of this file is documented in the dhcpd.leases(5) manual page.\n\
            # This lease file was written by isc-dhcp-4.4.3\n\
            \n\
            authoring-byte-order little-endian;\n\
            \n\
            lease 10.0.0.5 {\n\
            \n\
            # inside\n\
              starts 6 2024/03/09 11:00:00;\n\
               \t \n\
              ends 6 2024/03/09 13:00:00;\n\
              binding state active;\n\
              hardware ethernet aa:bb:cc:dd:ee:ff;\n\
              uid \"\\001\\252\\273\\314\\335\\356\\377\";\n\
            # before close\n\
            }\n\
            server-duid \"\\000\\001\\000\\001\";\n";
        let table = parse(text, 60)?;
        let expected = LeaseRecord {
            ip: "10.0.0.5".to_owned(),
            mac: Some("aa:bb:cc:dd:ee:ff".to_owned()),
            name: None,
            starts: parse_dhcp_time("2024/03/09 11:00:00").into_diagnostic()?,
            ends: parse_dhcp_time("2024/03/09 13:00:00").into_diagnostic()?,
        };
        assert_eq!(table.get("10.0.0.5"), Some(&expected));
        Ok(())
    }

    #[test]
    fn missing_ends_is_fatal() {
        let text = "lease 10.0.0.5 {\n  starts 6 2024/03/09 11:00:00;\n  hardware ethernet aa:bb:cc:dd:ee:ff;\n}\n";
        let res = parse(text, 60);
        match res {
            Err(DynleaseError::ParseError(e @ LeaseParseError::IncompleteBlock { .. })) => {
                assert_eq!(e.line(), 4);
                assert_eq!(e.to_string(), "lease 10.0.0.5 closes without its `ends` timestamp");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_is_fatal() {
        let text = "lease 10.0.0.5 {\n  starts 6 2024-03-09T11:00:00;\n}\n";
        let res = parse(text, 60);
        assert!(matches!(
            res,
            Err(DynleaseError::ParseError(LeaseParseError::MalformedTimestamp {
                field: "starts",
                line: 2,
                ..
            }))
        ));
    }

    #[test]
    fn hardware_without_address_is_fatal() {
        let text = "lease 10.0.0.5 {\n  hardware ethernet;\n}\n";
        let res = parse(text, 60);
        assert!(matches!(
            res,
            Err(DynleaseError::ParseError(LeaseParseError::MalformedLine { line: 2, .. }))
        ));
    }

    #[test]
    fn unclosed_trailing_block_is_dropped() -> Result<()> {
        let mut text = block("10.0.0.5", -10, 50, "  hardware ethernet aa:aa:aa:aa:aa:aa;\n");
        text += "lease 10.0.0.6 {\n  starts 6 2024/03/09 11:00:00;\n";
        let table = parse(&text, 60)?;
        assert_eq!(table.len(), 1);
        assert!(table.get("10.0.0.6").is_none());
        Ok(())
    }

    #[test]
    fn state_transitions() -> Result<()> {
        let mut parser = LeaseParser::new("dhcpd.leases", &options(60)).into_diagnostic()?;
        assert_eq!(parser.state(), &ParserState::Idle);
        parser.feed("}").into_diagnostic()?;
        assert_eq!(parser.state(), &ParserState::Idle);
        parser.feed("lease 10.0.0.5 {").into_diagnostic()?;
        assert_eq!(
            parser.state(),
            &ParserState::InBlock(PendingLease::new("10.0.0.5"))
        );
        parser.feed("  # comment").into_diagnostic()?;
        parser.feed("  starts 6 2024/03/09 11:00:00;").into_diagnostic()?;
        parser.feed("  ends 6 2024/03/09 13:00:00;").into_diagnostic()?;
        parser.feed("}").into_diagnostic()?;
        assert_eq!(parser.state(), &ParserState::Idle);
        assert_eq!(parser.finish().len(), 1);
        Ok(())
    }
}
