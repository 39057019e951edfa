// src/link/record.rs
//! The weighted-edge observation and its line format.
//!
//! Grammar: `"(" src "," dst "," weight ("," kind)? ")"`. A missing kind means
//! `REAL`. `format` always emits a fractional part and never an exponent, so
//! `parse(format(r)) == r` for every valid record.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::kind::LinkKind;
use crate::error::{LinkError, Result};

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(([0-9]+),([0-9]+),([0-9]+(?:\.[0-9]+)?)(?:,([A-Z0-9]+))?\)$")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// A single weighted interaction between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub src: u64,
    pub dst: u64,
    pub weight: f64,
    pub kind: LinkKind,
}

impl LinkRecord {
    #[must_use]
    pub const fn new(src: u64, dst: u64, weight: f64, kind: LinkKind) -> Self {
        Self {
            src,
            dst,
            weight,
            kind,
        }
    }

    #[must_use]
    pub const fn real(src: u64, dst: u64, weight: f64) -> Self {
        Self::new(src, dst, weight, LinkKind::Real)
    }

    /// Parses one dataset line.
    ///
    /// # Errors
    /// Returns `MalformedRecord` when the line does not match the grammar, an
    /// id overflows `u64`, or the kind is not a known identifier.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        let malformed = || LinkError::MalformedRecord {
            line: trimmed.to_string(),
        };

        let caps = RECORD_RE.captures(trimmed).ok_or_else(malformed)?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str()).ok_or_else(malformed);

        let src = field(1)?.parse::<u64>().map_err(|_| malformed())?;
        let dst = field(2)?.parse::<u64>().map_err(|_| malformed())?;
        let weight = field(3)?.parse::<f64>().map_err(|_| malformed())?;
        if !weight.is_finite() {
            return Err(malformed());
        }
        let kind = match caps.get(4) {
            Some(token) => LinkKind::from_exact(token.as_str()).ok_or_else(malformed)?,
            None => LinkKind::Real,
        };

        Ok(Self::new(src, dst, weight, kind))
    }

}

/// Shortest round-trip decimal, always with a fractional part.
///
/// Negative zero prints as `0.0`.
#[must_use]
pub fn format_weight(weight: f64) -> String {
    let mut text = (weight + 0.0).to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl fmt::Display for LinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weight = format_weight(self.weight);
        match self.kind {
            LinkKind::Real => write!(f, "({},{},{weight})", self.src, self.dst),
            kind => write!(f, "({},{},{weight},{kind})", self.src, self.dst),
        }
    }
}

impl FromStr for LinkRecord {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An undirected edge in canonical `(min, max)` orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub lo: u64,
    pub hi: u64,
}

impl Pair {
    /// Canonicalizes `(u, v)`; self-loops have no canonical pair.
    #[must_use]
    pub fn canonical(u: u64, v: u64) -> Option<Self> {
        match u.cmp(&v) {
            std::cmp::Ordering::Less => Some(Self { lo: u, hi: v }),
            std::cmp::Ordering::Greater => Some(Self { lo: v, hi: u }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn of(record: &LinkRecord) -> Option<Self> {
        Self::canonical(record.src, record.dst)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::MetricKind;

    #[test]
    fn parses_real_without_kind() {
        let record = LinkRecord::parse("(1,2,10.5)").ok();
        assert_eq!(record, Some(LinkRecord::real(1, 2, 10.5)));
    }

    #[test]
    fn parses_integer_weight_and_kind() {
        let record = LinkRecord::parse("(3,4,7,NTA)").ok();
        assert_eq!(
            record,
            Some(LinkRecord::new(3, 4, 7.0, LinkKind::Mined(MetricKind::Nta)))
        );
    }

    #[test]
    fn trims_carriage_return() {
        assert!(LinkRecord::parse("(1,2,1.0)\r").is_ok());
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in [
            "",
            "(1,2)",
            "1,2,3",
            "(-1,2,3.0)",
            "(1,2,3.5,BOGUS)",
            "(1,2,3,5)",
            "(1,2,3.,TA)",
            "(1,2,1,0)",
            "(99999999999999999999,1,1.0)",
        ] {
            assert!(
                matches!(LinkRecord::parse(line), Err(LinkError::MalformedRecord { .. })),
                "expected malformed: {line:?}"
            );
        }
    }

    #[test]
    fn format_is_locale_free_and_keeps_fraction() {
        assert_eq!(LinkRecord::real(1, 2, 0.0).to_string(), "(1,2,0.0)");
        assert_eq!(LinkRecord::real(1, 2, 3.0).to_string(), "(1,2,3.0)");
        assert_eq!(
            LinkRecord::new(1, 2, 123.123, LinkKind::Mined(MetricKind::Ta)).to_string(),
            "(1,2,123.123,TA)"
        );
        assert_eq!(format_weight(1e21), "1000000000000000000000.0");
        assert_eq!(format_weight(1e-7), "0.0000001");
        assert_eq!(format_weight(-0.0), "0.0");
    }

    #[test]
    fn negative_zero_reads_back_as_zero() {
        let line = LinkRecord::real(1, 2, -0.0).to_string();
        assert_eq!(line, "(1,2,0.0)");
        assert_eq!(LinkRecord::parse(&line).ok(), Some(LinkRecord::real(1, 2, 0.0)));
    }

    #[test]
    fn round_trips_every_kind() {
        let mut records = vec![LinkRecord::real(1, 2, 0.0)];
        for metric in MetricKind::ALL {
            records.push(LinkRecord::new(1, 2, 123.123, LinkKind::Mined(metric)));
        }
        records.push(LinkRecord::real(u64::MAX, 0, 0.1 + 0.2));
        records.push(LinkRecord::real(5, 5, 1e-12));

        for expected in records {
            let line = expected.to_string();
            assert_eq!(LinkRecord::parse(&line).ok(), Some(expected), "line {line}");
        }
    }

    #[test]
    fn canonical_pair_orders_and_drops_self_loops() {
        assert_eq!(Pair::canonical(5, 2), Some(Pair { lo: 2, hi: 5 }));
        assert_eq!(Pair::canonical(2, 5), Pair::canonical(5, 2));
        assert_eq!(Pair::canonical(4, 4), None);
    }
}
