// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Mode registry and scale walking.
//!
//! A mode is a fixed pattern of semitone steps. Walking the pattern up
//! and down from a starting pitch yields every in-mode pitch reachable
//! within range.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use super::pitch::{PitchValue, MAX_PITCH, PITCH_COUNT};
use crate::error::{RandsikError, Result};

/// Name of the mode that covers every pitch
pub const CHROMATIC: &str = "chromatic";

/// Lowest pitch the downward walk may produce
pub const DOWNWARD_FLOOR: u8 = 20;

/// A named step pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    /// Semitone steps, summing to one octave
    pub steps: &'static [u8],
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The diatonic modes, in registry order
pub const MODES: [Mode; 7] = [
    Mode { name: "ionian", steps: &[2, 2, 1, 2, 2, 2, 1] },
    Mode { name: "dorian", steps: &[2, 1, 2, 2, 2, 1, 2] },
    Mode { name: "phrygian", steps: &[1, 2, 2, 2, 1, 2, 2] },
    Mode { name: "lydian", steps: &[2, 2, 2, 1, 2, 2, 1] },
    Mode { name: "mixolydian", steps: &[2, 2, 1, 2, 2, 1, 2] },
    Mode { name: "aeolian", steps: &[2, 1, 2, 2, 1, 2, 2] },
    Mode { name: "locrian", steps: &[1, 2, 2, 1, 2, 2, 2] },
];

lazy_static! {
    static ref MODE_REGISTRY: HashMap<&'static str, &'static Mode> =
        MODES.iter().map(|mode| (mode.name, mode)).collect();
}

/// Find a mode by name
pub fn mode(name: &str) -> Result<&'static Mode> {
    MODE_REGISTRY
        .get(name)
        .copied()
        .ok_or_else(|| RandsikError::UnknownMode(name.to_string()))
}

/// Every name accepted by [`derive`], chromatic last
pub fn mode_names() -> Vec<&'static str> {
    MODES.iter().map(|m| m.name).chain(std::iter::once(CHROMATIC)).collect()
}

/// Walks a mode's steps away from a starting pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleWalker {
    floor: u8,
}

impl Default for ScaleWalker {
    fn default() -> Self {
        Self { floor: DOWNWARD_FLOOR }
    }
}

impl ScaleWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different lower bound for the downward walk
    pub fn with_floor(floor: u8) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    /// Derive the pitches of `mode_name` reachable from `start`.
    ///
    /// The result is the upward walk (starting with `start` itself,
    /// strictly increasing, stopping before 127 is exceeded) followed by
    /// the downward walk (strictly decreasing, stopping before the floor
    /// is crossed). `"chromatic"` ignores `start` and returns 0-127.
    pub fn derive(&self, mode_name: &str, start: PitchValue) -> Result<Vec<PitchValue>> {
        if mode_name == CHROMATIC {
            return Ok((0..PITCH_COUNT as u8).map(PitchValue).collect());
        }

        let steps = mode(mode_name)?.steps;
        let mut pitches = self.walk_up(steps, start);
        pitches.extend(self.walk_down(steps, start));
        Ok(pitches)
    }

    fn walk_up(&self, steps: &[u8], start: PitchValue) -> Vec<PitchValue> {
        let mut pitches = vec![start];
        let mut current = start.value() as i32;

        'walk: loop {
            for &step in steps {
                current += step as i32;
                if current > MAX_PITCH as i32 {
                    break 'walk;
                }
                pitches.push(PitchValue(current as u8));
            }
        }

        pitches
    }

    fn walk_down(&self, steps: &[u8], start: PitchValue) -> Vec<PitchValue> {
        let mut pitches = Vec::new();
        let mut current = start.value() as i32;

        'walk: loop {
            for &step in steps.iter().rev() {
                current -= step as i32;
                if current < self.floor as i32 {
                    break 'walk;
                }
                pitches.push(PitchValue(current as u8));
            }
        }

        pitches
    }
}

/// Derive with the default floor
pub fn derive(mode_name: &str, start: PitchValue) -> Result<Vec<PitchValue>> {
    ScaleWalker::default().derive(mode_name, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(value: i64) -> PitchValue {
        PitchValue::new(value).unwrap()
    }

    fn values(pitches: &[PitchValue]) -> Vec<u8> {
        pitches.iter().map(|p| p.value()).collect()
    }

    #[test]
    fn test_modes_span_an_octave() {
        for mode in MODES {
            assert_eq!(mode.steps.len(), 7, "{}", mode);
            assert_eq!(mode.steps.iter().map(|&s| s as u32).sum::<u32>(), 12, "{}", mode);
        }
    }

    #[test]
    fn test_mode_lookup() {
        assert_eq!(mode("dorian").unwrap().steps, &[2, 1, 2, 2, 2, 1, 2]);
        assert_eq!(mode("nope").unwrap_err(), RandsikError::UnknownMode("nope".into()));
        // Chromatic has no step pattern
        assert!(mode(CHROMATIC).is_err());
    }

    #[test]
    fn test_mode_names() {
        let names = mode_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "ionian");
        assert_eq!(names[7], "chromatic");
    }

    #[test]
    fn test_chromatic_ignores_start() {
        for start in [0, 60, 127] {
            let pitches = derive(CHROMATIC, pitch(start)).unwrap();
            assert_eq!(values(&pitches), (0..=127).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn test_ionian_from_c4() {
        let pitches = derive("ionian", pitch(60)).unwrap();
        let v = values(&pitches);

        assert_eq!(&v[..8], &[60, 62, 64, 65, 67, 69, 71, 72]);

        // Upward walk ends at G9, the last in-scale pitch below 128
        let top = v.iter().position(|&p| p == 127).unwrap();
        assert_eq!(v[top + 1], 59);
        assert_eq!(&v[top + 1..top + 8], &[59, 57, 55, 53, 52, 50, 48]);

        // Downward walk stops before the floor
        assert_eq!(*v.last().unwrap(), 21);
    }

    #[test]
    fn test_walks_are_monotonic_and_in_range() {
        for mode in MODES {
            for start in [20, 45, 60, 90, 127] {
                let pitches = derive(mode.name, pitch(start)).unwrap();
                let v = values(&pitches);
                let split = v.windows(2).position(|w| w[1] <= w[0]).map_or(v.len(), |i| i + 1);

                assert_eq!(v[0], start as u8);
                assert!(v[..split].windows(2).all(|w| w[0] < w[1]), "{} up", mode);
                assert!(v[split..].windows(2).all(|w| w[0] > w[1]), "{} down", mode);
                assert!(v[split..].iter().all(|&p| p >= DOWNWARD_FLOOR));
                assert!(v.iter().all(|&p| p <= MAX_PITCH));
            }
        }
    }

    #[test]
    fn test_start_at_top_of_range() {
        let pitches = derive("ionian", pitch(127)).unwrap();
        let v = values(&pitches);
        assert_eq!(&v[..3], &[127, 126, 124]);
    }

    #[test]
    fn test_start_below_floor() {
        let pitches = derive("aeolian", pitch(10)).unwrap();
        let v = values(&pitches);
        assert_eq!(&v[..3], &[10, 12, 13]);
        // No downward values at all: 10 - 2 is already below 20
        assert_eq!(v.last(), v.iter().max());
        assert!(v.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_custom_floor() {
        let walker = ScaleWalker::with_floor(0);
        assert_eq!(walker.floor(), 0);
        let v = values(&walker.derive("ionian", pitch(12)).unwrap());
        assert_eq!(*v.last().unwrap(), 0);
        assert_eq!(ScaleWalker::new().floor(), DOWNWARD_FLOOR);
    }

    #[test]
    fn test_unknown_mode() {
        assert!(matches!(
            derive("hypoionian", pitch(60)),
            Err(RandsikError::UnknownMode(_))
        ));
    }
}
