use crate::config::DHCP_TIME_FORMAT;
use jiff::{civil::DateTime, tz::TimeZone, Timestamp};

/// Parse a lease timestamp (`YYYY/MM/DD HH:MM:SS`).
/// dhcpd writes them in UTC, no conversion is applied.
pub fn parse_dhcp_time(text: &str) -> Result<Timestamp, jiff::Error> {
    let datetime = DateTime::strptime(DHCP_TIME_FORMAT, text)?;
    let timestamp = datetime.to_zoned(TimeZone::UTC)?.timestamp();
    Ok(timestamp)
}

pub fn display_dhcp_time(timestamp: &Timestamp) -> String {
    timestamp.strftime(DHCP_TIME_FORMAT).to_string()
}
