// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Options for random pattern generation.

use serde::{Deserialize, Serialize};

use crate::error::{RandsikError, Result};
use crate::music::instrument::ProgramSpec;
use crate::pattern::{MAX_CHANNEL, MAX_VELOCITY};
use crate::timing::DEFAULT_NOTE_LENGTHS;

/// Everything [`generate`](super::PatternGenerator::generate) needs.
///
/// Every field has a default, so config files only list what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Starting pitch name (e.g. "C4"); random mid-range pitch if unset
    pub note: Option<String>,
    /// Mode name; random diatonic mode if unset
    pub mode: Option<String>,
    /// Octave span of the pitch range
    pub octaves: u32,
    /// Number of measures to fill
    pub measures: u32,
    /// Time signature as "beats/unit"
    pub time_sig: String,
    /// 1-based positions into the pitch range to draw from
    pub scale_degrees: Option<Vec<i64>>,
    /// Tempo in BPM
    pub tempo: f64,
    /// Velocity for every note (0-127)
    pub velocity: u8,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Note lengths to draw from, in pulses
    pub note_lengths: Vec<u32>,
    /// Instrument program, as a 1-based number or a General MIDI name
    pub program: ProgramSpec,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            note: None,
            mode: None,
            octaves: 1,
            measures: 1,
            time_sig: "4/4".to_string(),
            scale_degrees: None,
            tempo: 120.0,
            velocity: 127,
            channel: 0,
            note_lengths: DEFAULT_NOTE_LENGTHS.to_vec(),
            program: ProgramSpec::default(),
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_measures(mut self, measures: u32) -> Self {
        self.measures = measures;
        self
    }

    pub fn with_time_sig(mut self, time_sig: impl Into<String>) -> Self {
        self.time_sig = time_sig.into();
        self
    }

    pub fn with_scale_degrees(mut self, degrees: Vec<i64>) -> Self {
        self.scale_degrees = Some(degrees);
        self
    }

    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_note_lengths(mut self, lengths: Vec<u32>) -> Self {
        self.note_lengths = lengths;
        self
    }

    pub fn with_program(mut self, program: impl Into<ProgramSpec>) -> Self {
        self.program = program.into();
        self
    }

    /// Check the numeric options that have no dedicated error.
    ///
    /// Pitch names, modes, time signatures and scale degrees are checked
    /// where they are resolved.
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(RandsikError::option("octaves", "must be at least 1"));
        }
        if self.measures == 0 {
            return Err(RandsikError::option("measures", "must be at least 1"));
        }
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return Err(RandsikError::option(
                "tempo",
                format!("{} is not a positive BPM", self.tempo),
            ));
        }
        if self.velocity > MAX_VELOCITY {
            return Err(RandsikError::option(
                "velocity",
                format!("{} is not in 0-127", self.velocity),
            ));
        }
        if self.channel > MAX_CHANNEL {
            return Err(RandsikError::option(
                "channel",
                format!("{} is not in 0-15", self.channel),
            ));
        }
        if self.note_lengths.is_empty() {
            return Err(RandsikError::option("note_lengths", "must not be empty"));
        }
        if self.note_lengths.contains(&0) {
            return Err(RandsikError::option("note_lengths", "lengths must be positive"));
        }
        self.program.resolve()?;
        Ok(())
    }
}
