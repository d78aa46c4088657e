// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Network loader for whitespace-delimited topology files.
//!
//! The format is the one emitted when converting SNDlib-style topologies into
//! a flat token stream:
//!
//! ```raw
//! N M                                   # number of nodes and links
//! node_1 ... node_N                     # node identifiers
//! link_id source target capacity cost   # M link records
//! ```
//!
//! Identifiers are arbitrary non-whitespace tokens. Lines may carry comments
//! introduced by `#`. The loader only tokenizes and parses; all structural
//! validation (unknown endpoints, duplicate ids, bad capacities) is done by
//! `NetworkBuilder::build` and surfaced as `LoaderError::Construction`.

use crate::{
    error::ConstructionError,
    network::{LinkRecord, Network, NetworkBuilder},
};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the network loading process.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input stream ended unexpectedly (e.g., missing tokens).
    #[error("Unexpected end of file while parsing network")]
    UnexpectedEof,
    /// A token could not be parsed into the expected type.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseTokenError),
    /// The header declares no nodes.
    #[error("Network dimensions must declare at least one node")]
    InvalidDimensions,
    /// The parsed description does not form a valid network.
    #[error("Invalid network: {0}")]
    Construction(#[from] ConstructionError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse token '{token}' as type {type_name}")]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

/// Loads `Network`s from text.
///
/// # Configuration
/// * `load_fraction`: If set, every link is loaded to `fraction * capacity`
///   after construction. Topology files carry no load, and a uniform
///   half-loaded network is the usual starting point for experiments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkLoader {
    load_fraction: Option<f64>,
}

impl NetworkLoader {
    /// Creates a new `NetworkLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every link to `fraction * capacity` after parsing.
    #[inline]
    pub fn load_fraction(mut self, fraction: f64) -> Self {
        self.load_fraction = Some(fraction);
        self
    }

    /// Loads a network from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Network, LoaderError> {
        let mut sc = Scanner::new(rdr);

        let num_nodes: usize = sc.next()?;
        let num_links: usize = sc.next()?;
        if num_nodes == 0 {
            return Err(LoaderError::InvalidDimensions);
        }

        let mut builder = NetworkBuilder::new();
        for _ in 0..num_nodes {
            let id: String = sc.next()?;
            builder.add_node(id);
        }

        for _ in 0..num_links {
            let id: String = sc.next()?;
            let source: String = sc.next()?;
            let target: String = sc.next()?;
            let capacity: f64 = sc.next()?;
            let cost: f64 = sc.next()?;
            builder.add_record(LinkRecord::new(id, source, target, capacity, cost));
        }

        let mut network = builder.build()?;
        if let Some(fraction) = self.load_fraction {
            network.set_load_fraction(fraction)?;
        }
        Ok(network)
    }

    /// Loads a network from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Network, LoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a network from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Network, LoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a network from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Network, LoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, LoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the next token of the current line, if any, and advances
    /// past it.
    fn next_in_line(&mut self) -> Option<(usize, usize)> {
        let rest = &self.buf[self.pos..];
        let content = match rest.find('#') {
            Some(hash) => &rest[..hash],
            None => rest,
        };

        let skipped = content.len() - content.trim_start().len();
        let token_start = self.pos + skipped;
        let token_len = content[skipped..]
            .find(char::is_whitespace)
            .unwrap_or(content.len() - skipped);

        if token_len == 0 {
            self.pos = self.buf.len();
            return None;
        }
        self.pos = token_start + token_len;
        Some((token_start, self.pos))
    }

    /// Reads the next token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, LoaderError>
    where
        T: FromStr,
    {
        loop {
            if let Some((start, end)) = self.next_in_line() {
                let token = &self.buf[start..end];
                return token.parse::<T>().map_err(|_| {
                    LoaderError::Parse(ParseTokenError {
                        token: token.to_owned(),
                        type_name: std::any::type_name::<T>(),
                    })
                });
            }
            if !self.fill_line()? {
                return Err(LoaderError::UnexpectedEof);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{LinkIndex, NodeIndex};

    const DIAMOND: &str = r#"
        6 7            # nodes, links
        S K a b c d
        L1 S a 1 0     # first branch
        L2 S c 1 0
        L3 a b 1 0
        L4 a K 1 0
        L5 b K 1 0
        L6 c d 1 0
        L7 d K 1 0
    "#;

    #[test]
    fn test_loads_diamond() {
        let net = NetworkLoader::new().from_str(DIAMOND).expect("Failed to load");
        assert_eq!(net.num_nodes(), 6);
        assert_eq!(net.num_links(), 7);
        assert_eq!(net.node_index("c"), Some(NodeIndex::new(4)));
        assert_eq!(net.link_index("L7"), Some(LinkIndex::new(6)));
        assert_eq!(
            net.link(LinkIndex::new(3)).ends(),
            [NodeIndex::new(2), NodeIndex::new(1)]
        );
    }

    #[test]
    fn test_load_fraction_applied() {
        let net = NetworkLoader::new()
            .load_fraction(0.5)
            .from_str(DIAMOND)
            .expect("Failed to load");
        assert!(net.links().all(|(_, link)| link.load() == 0.5));
    }

    #[test]
    fn test_comment_glued_to_token() {
        let data = "2 1\na b#trailing\nx a b 4.5 2";
        let net = NetworkLoader::new().from_str(data).expect("Failed to load");
        assert_eq!(net.node_id(NodeIndex::new(1)), "b");
        assert_eq!(net.link(LinkIndex::new(0)).capacity(), 4.5);
    }

    #[test]
    fn test_parse_error_structure() {
        let data = "2 1 a b x a b lots 0";
        match NetworkLoader::new().from_str(data) {
            Err(LoaderError::Parse(e)) => {
                assert_eq!(e.token, "lots");
                assert!(e.type_name.contains("f64"));
            }
            other => panic!("Expected Parse error with context, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_eof() {
        let data = "2 1 a b x a";
        assert!(matches!(
            NetworkLoader::new().from_str(data),
            Err(LoaderError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            NetworkLoader::new().from_str("0 0"),
            Err(LoaderError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_construction_errors_are_wrapped() {
        let data = "2 1 a b x a ghost 1 0";
        assert!(matches!(
            NetworkLoader::new().from_str(data),
            Err(LoaderError::Construction(ConstructionError::UnknownNode { .. }))
        ));
    }
}
