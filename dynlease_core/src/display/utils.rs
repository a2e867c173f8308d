use crate::lease::display_dhcp_time;
use jiff::Timestamp;

pub fn display_optional(value: &Option<String>) -> String {
    match value {
        Some(value) => value.to_owned(),
        None => "".to_owned(),
    }
}

pub fn display_until(ends: &Timestamp) -> String {
    display_dhcp_time(ends)
}
