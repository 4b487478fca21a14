//! Log line formats
//!
//! Both formats are reproduced exactly; downstream tooling parses them.

use std::fmt;
use crate::resolve::Resolution;

/// One line of the requester log
///
/// `Thread <id> serviced <files> files and <lines> lines`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRecord {
    /// Requester index
    pub thread: usize,
    /// Files this requester took at least one line from
    pub files: usize,
    /// Lines this requester pushed
    pub lines: usize,
}

impl fmt::Display for StatsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread {} serviced {} files and {} lines", self.thread, self.files, self.lines)
    }
}

/// One line of the resolver log
///
/// `<hostname>,<address-or-failure-marker>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRecord<'a> {
    /// Hostname as read, terminator removed
    pub hostname: &'a str,
    /// Address, or the failure marker when the lookup failed
    pub resolution: &'a Resolution,
}

impl fmt::Display for ResultRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.hostname, self.resolution.as_str())
    }
}
