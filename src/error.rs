//! Errors raised when parsing addresses and subnets at the directory boundary.

use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;

/// The part of an address or CIDR string that could not be parsed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The address is not a dotted-quad IPv4 literal.
    #[error("invalid IPv4 address")]
    Address,
    /// A CIDR string without a `/`.
    #[error("missing `/` separator")]
    MissingSeparator,
    /// The prefix length is not a decimal number in `0..=32`.
    #[error("invalid prefix length")]
    PrefixLength,
}

/// A string that could not be parsed as an IPv4 address or subnet, and the reason why.
#[derive(Error, PartialEq, Eq, Clone)]
pub struct ParseError {
    /// What was wrong with the input.
    pub kind: ParseErrorKind,
    /// The offending input.
    pub input: String,
}

impl ParseError {
    /// Constructs a new `ParseError` of the given kind for `input`.
    pub fn new(kind: ParseErrorKind, input: &str) -> Self {
        Self {
            kind,
            input: input.to_owned(),
        }
    }
}

impl Debug for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.input)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.input)
    }
}
