// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Event track rendering.
//!
//! Turns a sequence of notes, rests and chords into program, tempo and
//! note start/stop events with delta times. Rests emit nothing; their
//! length is carried into the delta of the next note start.

use super::{Element, Event, Note};

/// Microseconds per quarter note for a tempo in BPM, rounded
pub fn bpm_to_tempo(bpm: f64) -> u32 {
    (60_000_000.0 / bpm).round() as u32
}

/// Render a sequence into an ordered event list.
///
/// `program` is 1-based and is written 0-based. A chord's notes go
/// through the same start/stop rule one by one; any pending rest delays
/// only the first of them.
pub fn build_events(sequence: &[Element], program: u8, channel: u8, tempo: f64) -> Vec<Event> {
    let mut events = Vec::with_capacity(2 + sequence.len() * 2);

    events.push(Event::ProgramChange {
        channel,
        program: program.saturating_sub(1),
    });
    events.push(Event::SetTempo {
        micros_per_beat: bpm_to_tempo(tempo),
    });

    let mut pending_rest: Option<u64> = None;

    for element in sequence {
        match element {
            Element::Rest(rest) => {
                pending_rest = Some(pending_rest.unwrap_or(0) + rest.duration());
            }
            Element::Note(note) => {
                write_note(&mut events, note, channel, pending_rest.take());
            }
            Element::Chord { notes } => {
                for note in notes {
                    write_note(&mut events, note, channel, pending_rest.take());
                }
            }
        }
    }

    events
}

fn write_note(events: &mut Vec<Event>, note: &Note, channel: u8, rest: Option<u64>) {
    events.push(Event::NoteStart {
        pitch: note.pitch(),
        velocity: note.velocity(),
        channel,
        delta: rest.unwrap_or(0),
    });
    events.push(Event::NoteStop {
        pitch: note.pitch(),
        velocity: note.velocity(),
        channel,
        delta: note.duration(),
    });
}
