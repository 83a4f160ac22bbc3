//! Target list files.
//!
//! One target per line. `#` starts a comment; blank lines are skipped.
//!
//! ```text
//! # scope
//! 10.0.0.0/8
//! evilcorp.com   # and all subdomains
//! dead::/64
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::Result;

/// Target list parser.
pub struct TargetListParser;

impl TargetListParser {
    /// Read raw target strings from a reader.
    ///
    /// Lines are returned unparsed; pass them to a
    /// [`TargetNormalizer`](crate::TargetNormalizer) or a
    /// [`TargetTree`](crate::TargetTree).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<String>> {
        let mut targets = Vec::new();

        for line in BufReader::new(reader).lines() {
            let line = line?;

            // Remove comments
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line.as_str(),
            };
            let line = line.trim();

            if !line.is_empty() {
                targets.push(line.to_string());
            }
        }

        Ok(targets)
    }

    /// Read raw target strings from a file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let targets = Self::parse(File::open(path)?)?;
        log::debug!("Loaded {} targets from {:?}", targets.len(), path);
        Ok(targets)
    }
}
