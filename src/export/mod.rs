// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! [`MidiExporter`] is a [`TrackSink`]: every pattern appended to it
//! becomes one track. A single track is written as a Type 0 file, more
//! than one as Type 1.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::pattern::{Event, TrackSink};
use crate::timing::PPQN;

/// Largest value a variable-length quantity can hold
pub const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Largest tempo the three-byte tempo meta event can hold
pub const MAX_TEMPO: u32 = 0x00FF_FFFF;

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Multiple simultaneous tracks
    Type1,
}

impl MidiFileFormat {
    fn header_value(self) -> u16 {
        match self {
            MidiFileFormat::Type0 => 0,
            MidiFileFormat::Type1 => 1,
        }
    }
}

/// Errors raised while encoding events
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Delta time {0} exceeds the variable-length limit")]
    DeltaTooLarge(u64),

    #[error("Tempo of {0} microseconds per beat is outside 1-16777215")]
    TempoOutOfRange(u32),

    #[error("Failed to write MIDI file: {0}")]
    Io(#[from] io::Error),
}

/// An encoded event with its delta time
#[derive(Debug, Clone)]
struct TrackEvent {
    delta: u32,
    data: Vec<u8>,
}

impl TrackEvent {
    fn encode(event: &Event) -> Result<Self, ExportError> {
        let delta = event.delta();
        if delta > MAX_DELTA {
            return Err(ExportError::DeltaTooLarge(delta));
        }

        let data = match *event {
            Event::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
            Event::SetTempo { micros_per_beat }
                if micros_per_beat == 0 || micros_per_beat > MAX_TEMPO =>
            {
                return Err(ExportError::TempoOutOfRange(micros_per_beat));
            }
            Event::SetTempo { micros_per_beat } => vec![
                0xFF,
                0x51,
                0x03,
                ((micros_per_beat >> 16) & 0xFF) as u8,
                ((micros_per_beat >> 8) & 0xFF) as u8,
                (micros_per_beat & 0xFF) as u8,
            ],
            Event::NoteStart {
                pitch,
                velocity,
                channel,
                ..
            } => vec![0x90 | (channel & 0x0F), pitch.value() & 0x7F, velocity & 0x7F],
            Event::NoteStop {
                pitch,
                velocity,
                channel,
                ..
            } => vec![0x80 | (channel & 0x0F), pitch.value() & 0x7F, velocity & 0x7F],
        };

        Ok(Self {
            delta: delta as u32,
            data,
        })
    }

    fn end_of_track() -> Self {
        Self {
            delta: 0,
            data: vec![0xFF, 0x2F, 0x00],
        }
    }
}

/// Collects pattern tracks and writes them as a Standard MIDI File
#[derive(Debug, Clone)]
pub struct MidiExporter {
    /// PPQN (ticks per quarter note)
    ppqn: u16,
    /// Finished tracks
    tracks: Vec<Vec<TrackEvent>>,
    /// Track currently being appended to
    current: Option<Vec<TrackEvent>>,
}

impl MidiExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self {
            ppqn: PPQN as u16,
            tracks: Vec::new(),
            current: None,
        }
    }

    /// Get PPQN
    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Number of tracks, including one still open
    pub fn track_count(&self) -> usize {
        self.tracks.len() + usize::from(self.current.is_some())
    }

    /// Format that [`write`](Self::write) will use
    pub fn format(&self) -> MidiFileFormat {
        if self.track_count() > 1 {
            MidiFileFormat::Type1
        } else {
            MidiFileFormat::Type0
        }
    }

    /// Export to file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write(&mut file)
    }

    /// Export to bytes
    pub fn export_to_bytes(&self) -> Vec<u8> {
        let tracks: Vec<&Vec<TrackEvent>> = self.tracks.iter().chain(self.current.as_ref()).collect();

        let mut buffer = Vec::new();
        write_header(&mut buffer, self.format(), tracks.len() as u16, self.ppqn);
        for track in tracks {
            write_track(&mut buffer, track);
        }
        buffer
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.export_to_bytes())
    }

    fn open_track(&mut self) -> &mut Vec<TrackEvent> {
        self.current.get_or_insert_with(Vec::new)
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackSink for MidiExporter {
    type Error = ExportError;

    fn begin_track(&mut self) -> Result<(), ExportError> {
        if let Some(track) = self.current.take() {
            self.tracks.push(track);
        }
        self.current = Some(Vec::new());
        Ok(())
    }

    fn push_event(&mut self, event: &Event) -> Result<(), ExportError> {
        let encoded = TrackEvent::encode(event)?;
        self.open_track().push(encoded);
        Ok(())
    }

    fn end_track(&mut self) -> Result<(), ExportError> {
        if let Some(track) = self.current.take() {
            self.tracks.push(track);
        }
        Ok(())
    }
}

/// Write MIDI file header chunk
fn write_header(buffer: &mut Vec<u8>, format: MidiFileFormat, num_tracks: u16, ppqn: u16) {
    // MThd
    buffer.extend_from_slice(b"MThd");
    // Chunk length (always 6)
    buffer.extend_from_slice(&[0, 0, 0, 6]);
    buffer.extend_from_slice(&format.header_value().to_be_bytes());
    buffer.extend_from_slice(&num_tracks.to_be_bytes());
    buffer.extend_from_slice(&ppqn.to_be_bytes());
}

/// Write a track chunk, closing it with an end-of-track event
fn write_track(buffer: &mut Vec<u8>, events: &[TrackEvent]) {
    let mut track_data = Vec::new();

    for event in events.iter().chain(std::iter::once(&TrackEvent::end_of_track())) {
        write_variable_length(&mut track_data, event.delta);
        track_data.extend_from_slice(&event.data);
    }

    // MTrk
    buffer.extend_from_slice(b"MTrk");
    buffer.extend_from_slice(&(track_data.len() as u32).to_be_bytes());
    buffer.extend_from_slice(&track_data);
}

/// Write variable-length quantity
fn write_variable_length(buffer: &mut Vec<u8>, mut value: u32) {
    let mut bytes = Vec::new();

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buffer.extend_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::pitch::PitchValue;
    use crate::pattern::{Element, Note, Pattern, Rest};

    fn single_note_pattern() -> Pattern {
        Pattern::new(
            vec![Element::from(Note::new(60, 127, 480).unwrap())],
            120.0,
            1,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_exporter_creation() {
        let exporter = MidiExporter::new();
        assert_eq!(exporter.ppqn(), 480);
        assert_eq!(exporter.track_count(), 0);
        assert_eq!(exporter.format(), MidiFileFormat::Type0);
    }

    #[test]
    fn test_variable_length() {
        let mut buffer = Vec::new();

        write_variable_length(&mut buffer, 0);
        assert_eq!(buffer, vec![0x00]);

        buffer.clear();
        write_variable_length(&mut buffer, 127);
        assert_eq!(buffer, vec![0x7F]);

        buffer.clear();
        write_variable_length(&mut buffer, 128);
        assert_eq!(buffer, vec![0x81, 0x00]);

        buffer.clear();
        write_variable_length(&mut buffer, 480);
        assert_eq!(buffer, vec![0x83, 0x60]);

        buffer.clear();
        write_variable_length(&mut buffer, MAX_DELTA as u32);
        assert_eq!(buffer, vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_event_encoding() {
        let tempo = TrackEvent::encode(&Event::SetTempo { micros_per_beat: 500_000 }).unwrap();
        // 500000 = 0x07A120
        assert_eq!(tempo.data, vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);

        let program = TrackEvent::encode(&Event::ProgramChange { channel: 9, program: 118 }).unwrap();
        assert_eq!(program.data, vec![0xC9, 118]);

        let pitch = PitchValue::new(60).unwrap();
        let on = TrackEvent::encode(&Event::NoteStart { pitch, velocity: 100, channel: 1, delta: 240 }).unwrap();
        assert_eq!(on.delta, 240);
        assert_eq!(on.data, vec![0x91, 60, 100]);

        let off = TrackEvent::encode(&Event::NoteStop { pitch, velocity: 100, channel: 1, delta: 480 }).unwrap();
        assert_eq!(off.data, vec![0x81, 60, 100]);
    }

    #[test]
    fn test_delta_too_large() {
        let event = Event::NoteStop {
            pitch: PitchValue::new(60).unwrap(),
            velocity: 100,
            channel: 0,
            delta: MAX_DELTA + 1,
        };
        let mut exporter = MidiExporter::new();
        assert!(matches!(
            exporter.push_event(&event),
            Err(ExportError::DeltaTooLarge(_))
        ));
    }

    #[test]
    fn test_tempo_out_of_range() {
        let mut exporter = MidiExporter::new();

        // 2 BPM is 30 seconds per beat, past the three-byte limit
        let slow = Pattern::new(
            vec![Element::from(Note::new(60, 100, 480).unwrap())],
            2.0,
            1,
            0,
        )
        .unwrap();
        assert!(matches!(
            slow.append_to(&mut exporter),
            Err(ExportError::TempoOutOfRange(30_000_000))
        ));

        // What an absurdly high BPM rounds to
        assert!(matches!(
            exporter.push_event(&Event::SetTempo { micros_per_beat: 0 }),
            Err(ExportError::TempoOutOfRange(0))
        ));

        let slowest = TrackEvent::encode(&Event::SetTempo { micros_per_beat: MAX_TEMPO }).unwrap();
        assert_eq!(slowest.data, vec![0xFF, 0x51, 0x03, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_export_single_pattern() {
        let mut exporter = MidiExporter::new();
        single_note_pattern().append_to(&mut exporter).unwrap();

        let bytes = exporter.export_to_bytes();

        // Header
        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(bytes[9], 0); // Format 0
        assert_eq!(&bytes[10..12], &1u16.to_be_bytes());
        assert_eq!(&bytes[12..14], &480u16.to_be_bytes());

        // Track
        assert_eq!(&bytes[14..18], b"MTrk");
        let body = [
            0x00, 0xC0, 0x00, // program change
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
            0x00, 0x90, 60, 127, // note on
            0x83, 0x60, 0x80, 60, 127, // note off after 480
            0x00, 0xFF, 0x2F, 0x00, // end of track
        ];
        assert_eq!(&bytes[18..22], &(body.len() as u32).to_be_bytes());
        assert_eq!(&bytes[22..], &body);
    }

    #[test]
    fn test_export_multiple_patterns() {
        let drums = Pattern::new(
            vec![
                Element::from(Note::new(36, 127, 240).unwrap()),
                Element::from(Rest::new(240).unwrap()),
                Element::from(Note::new(40, 127, 240).unwrap()),
            ],
            120.0,
            119,
            9,
        )
        .unwrap();

        let mut exporter = MidiExporter::new();
        drums.append_to(&mut exporter).unwrap();
        single_note_pattern().append_to(&mut exporter).unwrap();

        assert_eq!(exporter.track_count(), 2);
        assert_eq!(exporter.format(), MidiFileFormat::Type1);

        let bytes = exporter.export_to_bytes();
        assert_eq!(bytes[9], 1);
        assert_eq!(&bytes[10..12], &2u16.to_be_bytes());
        assert_eq!(bytes.windows(4).filter(|w| w == b"MTrk").count(), 2);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.mid");

        let mut exporter = MidiExporter::new();
        single_note_pattern().append_to(&mut exporter).unwrap();
        exporter.export(&path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, exporter.export_to_bytes());
    }
}
