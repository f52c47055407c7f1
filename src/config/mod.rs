// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for randsik.
//!
//! A pattern file lists the patterns to render into one MIDI file. Each
//! entry is either generated from [`GenerateOptions`] or spelled out as an
//! explicit `sequence` of notes, rests and chords.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generators::{generate_pattern, GenerateOptions};
use crate::pattern::{Element, Pattern};

/// Root of a pattern file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PatternFile {
    /// RNG seed; fresh entropy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Output path for the rendered MIDI file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Patterns, one track each
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
}

impl PatternFile {
    /// Load a pattern file from YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a pattern file from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Render every entry in order
    pub fn render<R>(&self, rng: &mut R) -> Result<Vec<Pattern>>
    where
        R: Rng + ?Sized,
    {
        self.patterns
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .render(rng)
                    .with_context(|| format!("Failed to render pattern {}", index + 1))
            })
            .collect()
    }
}

/// One pattern in a file.
///
/// The playback settings (`tempo`, `program`, `channel`) come from the
/// options in both forms; the remaining options only matter when the
/// sequence is generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PatternEntry {
    /// Explicit sequence; generated from the options when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<Element>>,
    #[serde(flatten)]
    pub options: GenerateOptions,
}

impl PatternEntry {
    /// Entry generated from `options`
    pub fn generated(options: GenerateOptions) -> Self {
        Self {
            sequence: None,
            options,
        }
    }

    /// Entry with a fixed sequence
    pub fn fixed(sequence: Vec<Element>, options: GenerateOptions) -> Self {
        Self {
            sequence: Some(sequence),
            options,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.sequence.is_none()
    }

    pub fn render<R>(&self, rng: &mut R) -> crate::error::Result<Pattern>
    where
        R: Rng + ?Sized,
    {
        match &self.sequence {
            None => generate_pattern(&self.options, rng),
            Some(sequence) => {
                debug!(elements = sequence.len(), "Rendering fixed sequence");
                let program = self.options.program.resolve()?;
                Pattern::new(
                    sequence.clone(),
                    self.options.tempo,
                    program,
                    self.options.channel,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::ProgramSpec;
    use crate::pattern::{Event, Note, Rest};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_pattern_file() {
        let yaml = r#"
seed: 42
output: out.mid
patterns:
  - note: F2
    mode: ionian
    measures: 4
    scale_degrees: [1, 5, 7]
    note_lengths: [240]
    program: lead_1_square
    velocity: 50

  - mode: dorian
    program: 33
    channel: 1
"#;

        let file = PatternFile::from_yaml(yaml).unwrap();
        assert_eq!(file.seed, Some(42));
        assert_eq!(file.output.as_deref(), Some("out.mid"));
        assert_eq!(file.patterns.len(), 2);

        let lead = &file.patterns[0];
        assert!(lead.is_generated());
        assert_eq!(lead.options.note.as_deref(), Some("F2"));
        assert_eq!(lead.options.measures, 4);
        assert_eq!(lead.options.scale_degrees, Some(vec![1, 5, 7]));
        assert_eq!(lead.options.note_lengths, vec![240]);
        assert_eq!(lead.options.program, ProgramSpec::Name("lead_1_square".into()));
        assert_eq!(lead.options.velocity, 50);

        let bass = &file.patterns[1];
        assert_eq!(bass.options.program, ProgramSpec::Number(33));
        assert_eq!(bass.options.channel, 1);
    }

    #[test]
    fn test_default_values() {
        let file = PatternFile::from_yaml("patterns:\n  - {}\n").unwrap();
        assert_eq!(file.seed, None);
        assert_eq!(file.output, None);
        assert_eq!(file.patterns[0].options, GenerateOptions::default());

        let empty = PatternFile::from_yaml("{}").unwrap();
        assert!(empty.patterns.is_empty());
    }

    #[test]
    fn test_fixed_sequence_entry() {
        let yaml = r#"
patterns:
  - tempo: 100
    program: 1
    sequence:
      - { type: rest, duration: 240 }
      - { type: note, pitch: D4, velocity: 100, duration: 120 }
"#;

        let file = PatternFile::from_yaml(yaml).unwrap();
        let entry = &file.patterns[0];
        assert!(!entry.is_generated());

        let patterns = file.render(&mut StdRng::seed_from_u64(0)).unwrap();
        let events = patterns[0].events();
        assert_eq!(events[1], Event::SetTempo { micros_per_beat: 600_000 });
        assert_eq!(events[2].delta(), 240);
        assert_eq!(events[3].delta(), 120);
    }

    #[test]
    fn test_invalid_sequence_rejected() {
        let yaml = r#"
patterns:
  - sequence:
      - { type: note, pitch: C4, velocity: 300, duration: 120 }
"#;
        assert!(PatternFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_render_reports_failing_pattern() {
        let file = PatternFile {
            patterns: vec![
                PatternEntry::generated(GenerateOptions::new()),
                PatternEntry::generated(GenerateOptions::new().with_mode("bebop")),
            ],
            ..PatternFile::default()
        };

        let err = file.render(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(err.to_string().contains("pattern 2"));
    }

    #[test]
    fn test_seeded_render_is_repeatable() {
        let file = PatternFile::from_yaml("patterns:\n  - measures: 2\n  - mode: locrian\n").unwrap();

        let first = file.render(&mut StdRng::seed_from_u64(9)).unwrap();
        let second = file.render(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip() {
        let original = PatternFile {
            seed: Some(7),
            output: Some("song.mid".to_string()),
            patterns: vec![
                PatternEntry::generated(
                    GenerateOptions::new()
                        .with_note("A4")
                        .with_mode("aeolian")
                        .with_scale_degrees(vec![1, 3, 5])
                        .with_program("violin"),
                ),
                PatternEntry::fixed(
                    vec![
                        Element::from(Note::new(60, 100, 480).unwrap()),
                        Element::from(Rest::new(240).unwrap()),
                        Element::Chord {
                            notes: vec![
                                Note::new(60, 90, 240).unwrap(),
                                Note::new(64, 90, 240).unwrap(),
                            ],
                        },
                    ],
                    GenerateOptions::new().with_channel(3),
                ),
            ],
        };

        let yaml = original.to_yaml().unwrap();
        let parsed = PatternFile::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.yaml");

        let original = PatternFile {
            seed: Some(3),
            output: None,
            patterns: vec![PatternEntry::generated(GenerateOptions::new().with_measures(3))],
        };
        original.save(&path).unwrap();

        let loaded = PatternFile::load(&path).unwrap();
        assert_eq!(original, loaded);

        assert!(PatternFile::load(dir.path().join("missing.yaml")).is_err());
    }
}
