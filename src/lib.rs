// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! randsik - random scale-constrained MIDI pattern generator.
//!
//! Pick a start pitch and a mode, walk the mode into a pitch range, then
//! fill a number of measures with random pitches and note lengths. The
//! resulting [`Pattern`] renders into track events that can be written
//! to a Standard MIDI File through [`MidiExporter`].

pub mod config;
pub mod error;
pub mod export;
pub mod generators;
pub mod music;
pub mod pattern;
pub mod timing;

pub use config::{PatternEntry, PatternFile};
pub use error::{ErrorKind, RandsikError, Result};
pub use export::{ExportError, MidiExporter};
pub use generators::{generate_pattern, GenerateOptions, PatternGenerator};
pub use pattern::{Element, Event, Note, Pattern, Rest, TrackSink};
pub use timing::{time_sig_to_pulses, EIGHTH, HALF, PPQN, QUARTER, SIXTEENTH, THIRTY_SECOND, WHOLE};
