// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Time signatures and pulse budgets.

use std::fmt;
use std::str::FromStr;

use super::QUARTER;
use crate::error::{RandsikError, Result};

/// A "beats/unit" time signature (e.g. 4/4, 6/8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    numerator: u32,
    denominator: u32,
}

impl TimeSignature {
    /// Create a time signature. Both parts must be non-zero.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(RandsikError::InvalidTimeSignature(format!(
                "{}/{}",
                numerator, denominator
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Parse "beats/unit"
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || RandsikError::InvalidTimeSignature(s.to_string());

        let (num, den) = s.split_once('/').ok_or_else(invalid)?;
        let numerator: u32 = num.trim().parse().map_err(|_| invalid())?;
        let denominator: u32 = den.trim().parse().map_err(|_| invalid())?;

        Self::new(numerator, denominator).map_err(|_| invalid())
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Pulses in one measure: `(numerator / denominator) * 4 * QUARTER`,
    /// truncated toward zero.
    pub fn pulses_per_measure(&self) -> u64 {
        // Multiply before dividing so the truncation is exact
        self.numerator as u64 * 4 * QUARTER as u64 / self.denominator as u64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl FromStr for TimeSignature {
    type Err = RandsikError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Pulses per measure for a "beats/unit" string
pub fn time_sig_to_pulses(time_sig: &str) -> Result<u64> {
    Ok(TimeSignature::parse(time_sig)?.pulses_per_measure())
}
