//! Resolver (consumer) threads
//!
//! A resolver pops lines until the buffer reports that it is drained and shut
//! down. Malformed lines and failed lookups are logged and accounted for but
//! never stop the thread.

use std::fmt;
use std::io::Write;
use log::{debug, warn};
use lookup_core::constants::MAX_ADDRESS_LENGTH;
use lookup_core::{BoundedBuffer, Resolve, ResultRecord};
use crate::sink::LogSink;

/// What one resolver handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Resolver index
    pub id: usize,
    /// Lines resolved to an address
    pub resolved: usize,
    /// Lines written with the failure marker
    pub failed: usize,
    /// Malformed lines skipped without a lookup
    pub skipped: usize,
}

impl ResolverStats {
    /// Every line this resolver popped
    pub fn handled(&self) -> usize {
        self.resolved + self.failed + self.skipped
    }
}

/// Why a line was not looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// Hostname of `len` bytes, not shorter than `max`
    TooLong { len: usize, max: usize },
    /// Nothing left once the terminator was removed
    Empty,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::TooLong { len, max } => {
                write!(f, "hostname of {len} bytes is not shorter than {max}")
            }
            Malformed::Empty => write!(f, "empty hostname"),
        }
    }
}

/// Strip one trailing line terminator, then check the length limit
///
/// The limit applies to the hostname alone, so LF and CRLF inputs agree. A
/// reader that counted the newline would already reject a hostname of
/// `max_line_length - 1` bytes; this one accepts it.
pub fn clean_hostname(line: &str, max_line_length: usize) -> Result<&str, Malformed> {
    let host = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line);

    if host.len() >= max_line_length {
        return Err(Malformed::TooLong { len: host.len(), max: max_line_length });
    }
    if host.is_empty() {
        Err(Malformed::Empty)
    } else {
        Ok(host)
    }
}

/// Resolver thread body
pub fn run_resolver<R, W>(
    id: usize,
    buffer: &BoundedBuffer<String>,
    resolver: &R,
    result_log: &LogSink<W>,
    max_line_length: usize,
) -> ResolverStats
where
    R: Resolve + ?Sized,
    W: Write + Send,
{
    let mut stats = ResolverStats { id, ..Default::default() };

    while let Some(line) = buffer.pop() {
        let hostname = match clean_hostname(&line, max_line_length) {
            Ok(hostname) => hostname,
            Err(reason) => {
                let preview: String = line.chars().take(32).collect();
                warn!("skipping {preview:?}: {reason}");
                stats.skipped += 1;
                continue;
            }
        };

        let resolution = resolver.resolve(hostname, MAX_ADDRESS_LENGTH);
        if resolution.is_failed() {
            warn!("host {hostname} failed to resolve");
            stats.failed += 1;
        } else {
            stats.resolved += 1;
        }

        result_log.append(&ResultRecord { hostname, resolution: &resolution });
    }

    debug!(
        "drained: {} resolved, {} failed, {} skipped",
        stats.resolved, stats.failed, stats.skipped
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use lookup_core::{join_producers, Resolution};

    fn close(buffer: &BoundedBuffer<String>) {
        let (proof, _) = join_producers(Vec::<thread::JoinHandle<()>>::new());
        buffer.shut_down(proof);
    }

    fn stub(host: &str, _max: usize) -> Resolution {
        if host.starts_with("bad") {
            Resolution::Failed
        } else {
            Resolution::Address(format!("10.0.0.{}", host.len()))
        }
    }

    #[test]
    fn test_clean_hostname() {
        assert_eq!(clean_hostname("a.com", 1025), Ok("a.com"));
        assert_eq!(clean_hostname("a.com\n", 1025), Ok("a.com"));
        assert_eq!(clean_hostname("a.com\r\n", 1025), Ok("a.com"));
        assert_eq!(clean_hostname("a.com\r", 1025), Ok("a.com"));
        // Only one terminator is stripped
        assert_eq!(clean_hostname("a.com\n\n", 1025), Ok("a.com\n"));
        assert_eq!(clean_hostname("\r", 1025), Err(Malformed::Empty));
    }

    #[test]
    fn test_length_limit_is_exclusive() {
        let max = 1025;
        let ok = "a".repeat(max - 1);
        let long = "a".repeat(max);
        assert!(clean_hostname(&ok, max).is_ok());
        assert_eq!(clean_hostname(&long, max), Err(Malformed::TooLong { len: max, max }));
    }

    #[test]
    fn test_length_limit_ignores_terminator() {
        let max = 1025;
        let host = "a".repeat(max - 1);
        assert_eq!(clean_hostname(&format!("{host}\r"), max), Ok(host.as_str()));
        assert_eq!(clean_hostname(&format!("{host}\r\n"), max), Ok(host.as_str()));
        assert!(clean_hostname(&format!("{host}a\r"), max).is_err());
    }

    #[test]
    fn test_resolves_and_logs_each_line() {
        let buffer = BoundedBuffer::new(8);
        for host in ["a.com", "bad.example", "x".repeat(40).as_str(), "\r", "bb.com"] {
            buffer.push(host.to_string()).unwrap();
        }
        close(&buffer);

        let log = LogSink::new("resolver", Vec::new());
        let stats = run_resolver(0, &buffer, &stub, &log, 32);

        assert_eq!(stats, ResolverStats { id: 0, resolved: 2, failed: 1, skipped: 2 });
        assert_eq!(stats.handled(), 5);

        let out = String::from_utf8(log.finish().unwrap()).unwrap();
        assert_eq!(out, "a.com,10.0.0.5\nbad.example,\nbb.com,10.0.0.6\n");
    }

    #[test]
    fn test_all_failures_still_drain() {
        let buffer = BoundedBuffer::new(2);
        let log = LogSink::new("resolver", Vec::new());
        let always_fail = |_: &str, _: usize| Resolution::Failed;

        let stats = thread::scope(|s| {
            let resolvers: Vec<_> = (0..3)
                .map(|id| {
                    let (buffer, log, always_fail) = (&buffer, &log, &always_fail);
                    s.spawn(move || run_resolver(id, buffer, always_fail, log, 1025))
                })
                .collect();

            let producer = s.spawn(|| {
                for i in 0..50 {
                    buffer.push(format!("host{i}.invalid")).unwrap();
                }
            });
            let (proof, _) = join_producers(vec![producer]);
            buffer.shut_down(proof);

            resolvers.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });

        assert_eq!(stats.iter().map(|s| s.failed).sum::<usize>(), 50);
        assert_eq!(stats.iter().map(|s| s.resolved).sum::<usize>(), 0);

        let out = String::from_utf8(log.finish().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 50);
        assert!(out.lines().all(|l| l.ends_with(".invalid,")));
    }
}
