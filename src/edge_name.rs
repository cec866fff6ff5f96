//! Edge-name decoding
//!
//! FASTG headers name each sequence with a token that packs its id, length,
//! coverage and strand, e.g. `EDGE_3_length_100_cov_28.087'`. Two dialects are
//! understood: the SPAdes form and the MEGAHIT form, which appends an
//! `_ID_<n>` suffix. A trailing `'` marks the reverse-complement strand.

use crate::error::{FastgError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static SPADES_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:EDGE|NODE)_(?P<id>[A-Za-z0-9]+)_length_(?P<length>[0-9]+)_cov_(?P<cov>[0-9.]+)(?P<rc>')?$",
    )
    .expect("SPAdes edge-name pattern is valid")
});

static MEGAHIT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:EDGE|NODE)_(?P<id>[0-9]+)_length_(?P<length>[0-9]+)_cov_(?P<cov>[0-9.]+)_ID_[0-9]+(?P<rc>')?$",
    )
    .expect("MEGAHIT edge-name pattern is valid")
});

/// Strand of a declared sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Orientation::Forward),
            '-' => Some(Orientation::Reverse),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Forward => write!(f, "+"),
            Orientation::Reverse => write!(f, "-"),
        }
    }
}

/// Identity of one strand of a declared sequence; displays as `id+` / `id-`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeName {
    pub id: String,
    pub orientation: Orientation,
}

impl EdgeName {
    pub fn new(id: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            id: id.into(),
            orientation,
        }
    }

    /// Canonical node key
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EdgeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, self.orientation)
    }
}

impl FromStr for EdgeName {
    type Err = FastgError;

    /// Parse a canonical key such as `12-`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FastgError::InvalidInput(format!("Invalid edge name: {}", s));

        let orientation = s
            .chars()
            .last()
            .and_then(Orientation::from_char)
            .ok_or_else(invalid)?;
        let id = &s[..s.len() - 1];
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }

        Ok(EdgeName::new(id, orientation))
    }
}

/// Which naming scheme a token was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDialect {
    /// `EDGE_<id>_length_<n>_cov_<x>`
    Spades,
    /// `NODE_<id>_length_<n>_cov_<x>_ID_<n>`; the trailing id is dropped
    Megahit,
}

/// Everything an edge-name token declares about its sequence
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEdgeName {
    pub name: EdgeName,
    pub length: u64,
    pub coverage: f64,
    pub dialect: NameDialect,
}

impl DecodedEdgeName {
    /// Decode a single token. `line` is only used for error reporting.
    pub fn decode(token: &str, line: usize) -> Result<Self> {
        let malformed = || FastgError::MalformedEdgeName {
            line,
            token: token.to_string(),
        };

        let (caps, dialect) = if let Some(caps) = SPADES_NAME.captures(token) {
            (caps, NameDialect::Spades)
        } else if let Some(caps) = MEGAHIT_NAME.captures(token) {
            (caps, NameDialect::Megahit)
        } else {
            return Err(malformed());
        };

        let length: u64 = caps["length"].parse().map_err(|_| malformed())?;
        let coverage: f64 = caps["cov"].parse().map_err(|_| malformed())?;
        if !coverage.is_finite() {
            return Err(malformed());
        }
        let orientation = if caps.name("rc").is_some() {
            Orientation::Reverse
        } else {
            Orientation::Forward
        };

        Ok(DecodedEdgeName {
            name: EdgeName::new(&caps["id"], orientation),
            length,
            coverage,
            dialect,
        })
    }
}
