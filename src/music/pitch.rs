// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch names and MIDI pitch values.
//!
//! The table is built once: for every octave from -1 to 9, each of the
//! twelve pitch classes (starting at A) takes the next integer from a
//! counter that begins at -3. Enharmonic spellings share a value, and
//! anything outside 0-127 is dropped. This puts C4 at 60 but A4 at 57,
//! since octaves roll over at A rather than C.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{RandsikError, Result};

/// Highest valid pitch value
pub const MAX_PITCH: u8 = 127;

/// Number of pitch values (0-127)
pub const PITCH_COUNT: usize = 128;

/// Pitch classes with their spellings, in table order
const PITCH_CLASSES: [&[&str]; 12] = [
    &["A"],
    &["A#", "Bb"],
    &["B", "Cb"],
    &["C", "B#"],
    &["C#", "Db"],
    &["D"],
    &["D#", "Eb"],
    &["E", "Fb"],
    &["F", "E#"],
    &["F#", "Gb"],
    &["G"],
    &["G#", "Ab"],
];

const FIRST_OCTAVE: i32 = -1;
const LAST_OCTAVE: i32 = 9;

/// Value assigned to the first pitch class of the first octave
const COUNTER_START: i32 = -3;

/// MIDI pitch value (0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PitchValue(pub(crate) u8);

impl PitchValue {
    /// Create a pitch value, failing if out of range
    pub fn new(value: i64) -> Result<Self> {
        if (0..=MAX_PITCH as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RandsikError::validation("pitch", value, "must be between 0 and 127"))
        }
    }

    /// Raw value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Primary spelling of this pitch (e.g. "C4")
    pub fn name(self) -> &'static str {
        name_of(self)
    }
}

impl TryFrom<i64> for PitchValue {
    type Error = RandsikError;

    fn try_from(value: i64) -> Result<Self> {
        PitchValue::new(value)
    }
}

impl From<PitchValue> for u8 {
    fn from(pitch: PitchValue) -> u8 {
        pitch.0
    }
}

impl fmt::Display for PitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct PitchTable {
    by_name: HashMap<String, PitchValue>,
    /// Primary spelling for each value
    names: Vec<String>,
}

impl PitchTable {
    fn generate() -> Self {
        let mut by_name = HashMap::new();
        let mut names = vec![String::new(); PITCH_COUNT];
        let mut counter = COUNTER_START;

        for octave in FIRST_OCTAVE..=LAST_OCTAVE {
            for spellings in PITCH_CLASSES {
                if let Ok(pitch) = PitchValue::new(counter as i64) {
                    names[pitch.value() as usize] = format!("{}{}", spellings[0], octave);
                    for spelling in spellings {
                        by_name.insert(format!("{}{}", spelling, octave), pitch);
                    }
                }
                counter += 1;
            }
        }

        Self { by_name, names }
    }
}

lazy_static! {
    static ref PITCH_TABLE: PitchTable = PitchTable::generate();
}

/// Look up a pitch by name (e.g. "C4", "Bb3", "B#4")
pub fn lookup(name: &str) -> Result<PitchValue> {
    PITCH_TABLE
        .by_name
        .get(name)
        .copied()
        .ok_or_else(|| RandsikError::UnknownPitchName(name.to_string()))
}

/// Primary spelling for a pitch value
pub fn name_of(pitch: PitchValue) -> &'static str {
    &PITCH_TABLE.names[pitch.value() as usize]
}
