//! The name table: a persisted domain -> address mapping, consulted on the
//! query path and grown opportunistically on the response path.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;

use crate::dns::Error;

/// Store consumed by the relay engine. Implementations make no atomicity
/// or caching promises across calls.
pub trait NameStore {
    /// Every address recorded for `domain`, in store order; empty if none.
    fn lookup(&self, domain: &str) -> Result<Vec<String>, Error>;

    /// Persist one `domain -> address` mapping. The caller filters out
    /// pairs that are already present.
    fn record(&mut self, domain: &str, address: &str) -> Result<(), Error>;
}

/// Hosts-style file store: one `address domain` pair per line, `#` starts
/// a comment, blank lines ignored.
///
/// The file is re-read on every lookup, so edits made while the relay is
/// running take effect on the next query. A missing file reads as an
/// empty table and is created by the first record.
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        HostsFile { path: path.into() }
    }
}

impl NameStore for HostsFile {
    fn lookup(&self, domain: &str) -> Result<Vec<String>, Error> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(ref err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut found = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.split('#').next().unwrap_or("");
            let mut fields = line.split_whitespace();
            if let (Some(address), Some(name)) = (fields.next(), fields.next()) {
                if name.eq_ignore_ascii_case(domain) {
                    found.push(address.to_string());
                }
            }
        }
        Ok(found)
    }

    fn record(&mut self, domain: &str, address: &str) -> Result<(), Error> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} {}", address, domain)?;
        Ok(())
    }
}
