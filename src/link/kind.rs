// src/link/kind.rs
//! Typed identifiers for link kinds and prediction metrics.
//!
//! Every identifier that reaches the score store passes through these enums,
//! so a store never sees a free-form metric name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

/// Prediction algorithms whose scores can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricKind {
    Nra,
    Ta,
    Nta,
    Cn,
    Jaccard,
    Salton,
    Sorensen,
    Hpi,
    Hdi,
    Lhn1,
    Pa,
    Aa,
    Ra,
}

impl MetricKind {
    pub const ALL: [MetricKind; 13] = [
        MetricKind::Nra,
        MetricKind::Ta,
        MetricKind::Nta,
        MetricKind::Cn,
        MetricKind::Jaccard,
        MetricKind::Salton,
        MetricKind::Sorensen,
        MetricKind::Hpi,
        MetricKind::Hdi,
        MetricKind::Lhn1,
        MetricKind::Pa,
        MetricKind::Aa,
        MetricKind::Ra,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Nra => "NRA",
            MetricKind::Ta => "TA",
            MetricKind::Nta => "NTA",
            MetricKind::Cn => "CN",
            MetricKind::Jaccard => "JACCARD",
            MetricKind::Salton => "SALTON",
            MetricKind::Sorensen => "SORENSEN",
            MetricKind::Hpi => "HPI",
            MetricKind::Hdi => "HDI",
            MetricKind::Lhn1 => "LHN1",
            MetricKind::Pa => "PA",
            MetricKind::Aa => "AA",
            MetricKind::Ra => "RA",
        }
    }

    /// Exact, case-sensitive match as used inside record lines.
    #[must_use]
    pub fn from_exact(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }

    /// Parses `ALL` or a comma-separated list of metric names.
    ///
    /// # Errors
    /// Returns `UnknownIdentifier` for any entry outside the whitelist and
    /// `InvalidParameter` when the list is empty.
    pub fn parse_list(input: &str) -> Result<Vec<Self>> {
        parse_identifier_list(input, &Self::ALL)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LinkError::UnknownIdentifier {
                kind: "metric",
                value: trimmed.to_string(),
            })
    }
}

/// What a link record represents: an observed interaction or a mined score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    Real,
    Mined(MetricKind),
}

impl LinkKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkKind::Real => "REAL",
            LinkKind::Mined(metric) => metric.as_str(),
        }
    }

    /// Exact, case-sensitive match as used inside record lines.
    #[must_use]
    pub fn from_exact(token: &str) -> Option<Self> {
        if token == "REAL" {
            return Some(LinkKind::Real);
        }
        MetricKind::from_exact(token).map(LinkKind::Mined)
    }

    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, LinkKind::Real)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("REAL") {
            return Ok(LinkKind::Real);
        }
        trimmed.parse::<MetricKind>().map(LinkKind::Mined).map_err(|_| {
            LinkError::UnknownIdentifier {
                kind: "link kind",
                value: trimmed.to_string(),
            }
        })
    }
}

/// Shared `ALL` / comma-list parsing for whitelisted identifiers.
pub(crate) fn parse_identifier_list<T>(input: &str, all: &[T]) -> Result<Vec<T>>
where
    T: Copy + PartialEq + FromStr<Err = LinkError>,
{
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("ALL") {
        return Ok(all.to_vec());
    }

    let mut parsed = Vec::new();
    for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value = token.parse::<T>()?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }

    if parsed.is_empty() {
        return Err(LinkError::InvalidParameter(format!(
            "empty identifier list: {input:?}"
        )));
    }
    Ok(parsed)
}
