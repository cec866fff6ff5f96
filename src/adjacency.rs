//! Adjacency list parsing
//!
//! The part of a header after the primary edge name is either empty or a
//! `:` followed by comma-separated edge names, e.g.
//! `:EDGE_2_length_3_cov_1,EDGE_3_length_6_cov_2.5'`.

use crate::edge_name::{DecodedEdgeName, EdgeName};
use crate::error::{FastgError, Result};
use std::collections::HashSet;

const LIST_SEPARATOR: char = ':';
const NAME_SEPARATOR: char = ',';

/// Characters that introduce FASTG notation this parser does not handle:
/// bracketed properties, gap sizes, alternative alleles
const RESERVED_NOTATION: [char; 7] = ['[', ']', '(', ')', '{', '}', '~'];

/// Parse the adjacency region of the header declared for `source`.
///
/// Targets come back in file order. Repeating a target within the list is a
/// duplicate adjacency.
pub fn parse_adjacencies(
    region: &str,
    source: &EdgeName,
    line: usize,
) -> Result<Vec<DecodedEdgeName>> {
    if region.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(notation) = region.chars().find(|c| RESERVED_NOTATION.contains(c)) {
        return Err(FastgError::UnsupportedNotation { line, notation });
    }

    let list = region
        .strip_prefix(LIST_SEPARATOR)
        .ok_or_else(|| FastgError::MalformedEdgeName {
            line,
            token: region.to_string(),
        })?;

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for token in list.split(NAME_SEPARATOR) {
        let target = DecodedEdgeName::decode(token, line)?;
        if !seen.insert(target.name.clone()) {
            return Err(FastgError::DuplicateAdjacency {
                line,
                source_name: source.to_string(),
                target: target.name.to_string(),
            });
        }
        targets.push(target);
    }

    Ok(targets)
}
