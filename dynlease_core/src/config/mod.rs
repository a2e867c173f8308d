use bon::Builder;
use jiff::{SignedDuration, Timestamp};

// Error Handling
use dynlease_error::{DynleaseError, LibError};

/// The ISC dhcpd lease database.
pub const LEASES_FILE: &'static str = "/var/lib/dhcp/dhcpd.leases";

/// Default expiry grace window, in minutes.
pub const DEFAULT_EXPIRED_MINUTES: f64 = 60.0;

/// Shared by `starts` and `ends` statements, and by the report.
pub const DHCP_TIME_FORMAT: &'static str = "%Y/%m/%d %H:%M:%S";

/*
* Parse time settings.
*/
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ParseOptions {
    /// How far into the past an expired lease is still reported.
    #[builder(default = SignedDuration::from_mins(60))]
    pub delta: SignedDuration,
    /// Reference time the leases are compared against.
    #[builder(default = Timestamp::now())]
    pub now: Timestamp,
}
impl Default for ParseOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
impl ParseOptions {
    /// Convert a (possibly fractional) minute count into a grace window.
    pub fn delta_from_minutes(minutes: f64) -> Result<SignedDuration, DynleaseError> {
        if !minutes.is_finite() {
            let message = format!("Invalid expiry window {:?}", minutes);
            let help = "Pass a finite number of minutes, e.g. --expired 90";
            return Err(LibError::new(&message, help).into());
        }
        let delta = SignedDuration::try_from_secs_f64(minutes * 60.0)?;
        Ok(delta)
    }
    /// Leases ending before this instant are dropped.
    pub fn cutoff(&self) -> Result<Timestamp, DynleaseError> {
        let cutoff = self.now.checked_sub(self.delta)?;
        Ok(cutoff)
    }
}
