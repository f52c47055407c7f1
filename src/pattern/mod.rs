// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notes, rests and patterns.
//!
//! A [`Pattern`] owns an ordered sequence of [`Element`]s plus the tempo,
//! program and channel to play them with. Its event list is rendered once
//! when the pattern is built and never changes afterwards.

pub mod track;

pub use track::{bpm_to_tempo, build_events};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RandsikError, Result};
use crate::music::pitch::{self, PitchValue};

/// Highest velocity value
pub const MAX_VELOCITY: u8 = 127;

/// Highest MIDI channel (channels are 0-based)
pub const MAX_CHANNEL: u8 = 15;

/// General MIDI program numbers run 1-128
pub const MAX_PROGRAM: u8 = 128;

/// A single note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteFields")]
pub struct Note {
    pitch: PitchValue,
    velocity: u8,
    /// Duration in pulses
    duration: u64,
}

impl Note {
    /// Create a note, rejecting any out-of-range field
    pub fn new(pitch: i64, velocity: i64, duration: i64) -> Result<Self> {
        let pitch = PitchValue::new(pitch)?;
        Self::with_pitch(pitch, velocity, duration)
    }

    /// Create a note from a pitch name (e.g. "C4")
    pub fn named(name: &str, velocity: i64, duration: i64) -> Result<Self> {
        let pitch = pitch::lookup(name)?;
        Self::with_pitch(pitch, velocity, duration)
    }

    /// Create a note from an already validated pitch
    pub fn with_pitch(pitch: PitchValue, velocity: i64, duration: i64) -> Result<Self> {
        if !(0..=MAX_VELOCITY as i64).contains(&velocity) {
            return Err(RandsikError::validation(
                "velocity",
                velocity,
                "must be between 0 and 127",
            ));
        }
        Ok(Self {
            pitch,
            velocity: velocity as u8,
            duration: validate_duration(duration)?,
        })
    }

    pub fn pitch(&self) -> PitchValue {
        self.pitch
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vel {} for {}",
            self.pitch.name(),
            self.velocity,
            self.duration
        )
    }
}

/// A silence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RestFields")]
pub struct Rest {
    /// Duration in pulses
    duration: u64,
}

impl Rest {
    pub fn new(duration: i64) -> Result<Self> {
        Ok(Self {
            duration: validate_duration(duration)?,
        })
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

fn validate_duration(duration: i64) -> Result<u64> {
    if duration < 0 {
        return Err(RandsikError::validation(
            "duration",
            duration,
            "must not be negative",
        ));
    }
    Ok(duration as u64)
}

/// Pitch given either as a number or as a name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PitchField {
    Value(i64),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
struct NoteFields {
    pitch: PitchField,
    velocity: i64,
    duration: i64,
}

impl TryFrom<NoteFields> for Note {
    type Error = RandsikError;

    fn try_from(fields: NoteFields) -> Result<Self> {
        match fields.pitch {
            PitchField::Value(value) => Note::new(value, fields.velocity, fields.duration),
            PitchField::Name(name) => Note::named(&name, fields.velocity, fields.duration),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RestFields {
    duration: i64,
}

impl TryFrom<RestFields> for Rest {
    type Error = RandsikError;

    fn try_from(fields: RestFields) -> Result<Self> {
        Rest::new(fields.duration)
    }
}

/// One step of a sequence, in playback order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Note(Note),
    Rest(Rest),
    /// Notes struck together
    Chord { notes: Vec<Note> },
}

impl Element {
    /// Time this element occupies in the sequence.
    ///
    /// Chord notes are rendered one after another, so a chord lasts as
    /// long as its notes combined.
    pub fn duration(&self) -> u64 {
        match self {
            Element::Note(note) => note.duration(),
            Element::Rest(rest) => rest.duration(),
            Element::Chord { notes } => notes.iter().map(Note::duration).sum(),
        }
    }
}

impl From<Note> for Element {
    fn from(note: Note) -> Self {
        Element::Note(note)
    }
}

impl From<Rest> for Element {
    fn from(rest: Rest) -> Self {
        Element::Rest(rest)
    }
}

/// A rendered track event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Select an instrument (program is 0-based here)
    ProgramChange { channel: u8, program: u8 },
    /// Tempo in microseconds per quarter note
    SetTempo { micros_per_beat: u32 },
    NoteStart {
        pitch: PitchValue,
        velocity: u8,
        channel: u8,
        delta: u64,
    },
    NoteStop {
        pitch: PitchValue,
        velocity: u8,
        channel: u8,
        delta: u64,
    },
}

impl Event {
    /// Pulses since the previous event in the track
    pub fn delta(&self) -> u64 {
        match self {
            Event::ProgramChange { .. } | Event::SetTempo { .. } => 0,
            Event::NoteStart { delta, .. } | Event::NoteStop { delta, .. } => *delta,
        }
    }
}

/// Receives a pattern's events, in order.
///
/// Implementations encode them into whatever format they target. Each
/// [`Pattern::append_to`] call is bracketed by `begin_track` and
/// `end_track`.
pub trait TrackSink {
    type Error;

    /// Called before the first event of a pattern
    fn begin_track(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    /// Called once per event
    fn push_event(&mut self, event: &Event) -> std::result::Result<(), Self::Error>;

    /// Called after the last event of a pattern
    fn end_track(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Collecting sink
impl TrackSink for Vec<Event> {
    type Error = std::convert::Infallible;

    fn push_event(&mut self, event: &Event) -> std::result::Result<(), Self::Error> {
        self.push(*event);
        Ok(())
    }
}

/// A sequence with its playback settings and rendered events
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    sequence: Vec<Element>,
    /// Beats per minute
    tempo: f64,
    /// Program number (1-128)
    program: u8,
    /// MIDI channel (0-15)
    channel: u8,
    events: Vec<Event>,
}

impl Pattern {
    /// Build a pattern and render its events
    pub fn new(sequence: Vec<Element>, tempo: f64, program: u8, channel: u8) -> Result<Self> {
        if !(tempo.is_finite() && tempo > 0.0) {
            return Err(RandsikError::validation(
                "tempo",
                tempo as i64,
                "must be greater than 0",
            ));
        }
        if !(1..=MAX_PROGRAM).contains(&program) {
            return Err(RandsikError::validation(
                "program",
                program as i64,
                "must be between 1 and 128",
            ));
        }
        if channel > MAX_CHANNEL {
            return Err(RandsikError::validation(
                "channel",
                channel as i64,
                "must be between 0 and 15",
            ));
        }

        let events = build_events(&sequence, program, channel, tempo);

        Ok(Self {
            sequence,
            tempo,
            program,
            channel,
            events,
        })
    }

    pub fn sequence(&self) -> &[Element] {
        &self.sequence
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn program(&self) -> u8 {
        self.program
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Rendered events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Total length of the sequence in pulses
    pub fn duration(&self) -> u64 {
        self.sequence.iter().map(Element::duration).sum()
    }

    /// Hand every event to `sink`
    pub fn append_to<S>(&self, sink: &mut S) -> std::result::Result<(), S::Error>
    where
        S: TrackSink + ?Sized,
    {
        sink.begin_track()?;
        for event in &self.events {
            sink.push_event(event)?;
        }
        sink.end_track()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pattern({} elements, {} BPM, program {}, channel {})",
            self.sequence.len(),
            self.tempo,
            self.program,
            self.channel
        )
    }
}
