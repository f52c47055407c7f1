// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! General MIDI instrument catalog.
//!
//! Programs are numbered 1-128 and come in sixteen families of eight.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RandsikError, Result};

/// Instrument families, in program order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentFamily {
    Piano,
    ChromaticPercussion,
    Organ,
    Guitar,
    Bass,
    Strings,
    Ensemble,
    Brass,
    Reed,
    Pipe,
    SynthLead,
    SynthPad,
    SynthEffects,
    Ethnic,
    Percussive,
    SoundEffects,
}

impl InstrumentFamily {
    /// All families in program order
    pub const ALL: [InstrumentFamily; 16] = [
        InstrumentFamily::Piano,
        InstrumentFamily::ChromaticPercussion,
        InstrumentFamily::Organ,
        InstrumentFamily::Guitar,
        InstrumentFamily::Bass,
        InstrumentFamily::Strings,
        InstrumentFamily::Ensemble,
        InstrumentFamily::Brass,
        InstrumentFamily::Reed,
        InstrumentFamily::Pipe,
        InstrumentFamily::SynthLead,
        InstrumentFamily::SynthPad,
        InstrumentFamily::SynthEffects,
        InstrumentFamily::Ethnic,
        InstrumentFamily::Percussive,
        InstrumentFamily::SoundEffects,
    ];

    /// Family owning a 1-based program number
    pub fn of_program(program: u8) -> Option<Self> {
        if !(1..=128).contains(&program) {
            return None;
        }
        Some(Self::ALL[(program as usize - 1) / 8])
    }

    /// Programs in this family
    pub fn programs(self) -> std::ops::RangeInclusive<u8> {
        let first = self as u8 * 8 + 1;
        first..=first + 7
    }

    pub fn name(self) -> &'static str {
        match self {
            InstrumentFamily::Piano => "Piano",
            InstrumentFamily::ChromaticPercussion => "Chromatic Percussion",
            InstrumentFamily::Organ => "Organ",
            InstrumentFamily::Guitar => "Guitar",
            InstrumentFamily::Bass => "Bass",
            InstrumentFamily::Strings => "Strings",
            InstrumentFamily::Ensemble => "Ensemble",
            InstrumentFamily::Brass => "Brass",
            InstrumentFamily::Reed => "Reed",
            InstrumentFamily::Pipe => "Pipe",
            InstrumentFamily::SynthLead => "Synth Lead",
            InstrumentFamily::SynthPad => "Synth Pad",
            InstrumentFamily::SynthEffects => "Synth Effects",
            InstrumentFamily::Ethnic => "Ethnic",
            InstrumentFamily::Percussive => "Percussive",
            InstrumentFamily::SoundEffects => "Sound Effects",
        }
    }
}

impl fmt::Display for InstrumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Program names indexed by program - 1
const PROGRAM_NAMES: [&str; 128] = [
    // Piano
    "acoustic_grand_piano",
    "bright_acoustic_piano",
    "electric_grand_piano",
    "honky_tonk_piano",
    "electric_piano_1",
    "electric_piano_2",
    "harpsichord",
    "clavi",
    // Chromatic percussion
    "celesta",
    "glockenspiel",
    "music_box",
    "vibraphone",
    "marimba",
    "xylophone",
    "tubular_bells",
    "dulcimer",
    // Organ
    "drawbar_organ",
    "percussive_organ",
    "rock_organ",
    "church_organ",
    "reed_organ",
    "accordion",
    "harmonica",
    "tango_accordion",
    // Guitar
    "acoustic_guitar_nylon",
    "acoustic_guitar_steel",
    "electric_guitar_jazz",
    "electric_guitar_clean",
    "electric_guitar_muted",
    "overdriven_guitar",
    "distortion_guitar",
    "guitar_harmonics",
    // Bass
    "acoustic_bass",
    "electric_bass_finger",
    "electric_bass_pick",
    "fretless_bass",
    "slap_bass_1",
    "slap_bass_2",
    "synth_bass_1",
    "synth_bass_2",
    // Strings
    "violin",
    "viola",
    "cello",
    "contrabass",
    "tremolo_strings",
    "pizzicato_strings",
    "orchestral_harp",
    "timpani",
    // Ensemble
    "string_ensemble_1",
    "string_ensemble_2",
    "synth_strings_1",
    "synth_strings_2",
    "choir_aahs",
    "voice_oohs",
    "synth_voice",
    "orchestra_hit",
    // Brass
    "trumpet",
    "trombone",
    "tuba",
    "muted_trumpet",
    "french_horn",
    "brass_section",
    "synth_brass_1",
    "synth_brass_2",
    // Reed
    "soprano_sax",
    "alto_sax",
    "tenor_sax",
    "baritone_sax",
    "oboe",
    "english_horn",
    "bassoon",
    "clarinet",
    // Pipe
    "piccolo",
    "flute",
    "recorder",
    "pan_flute",
    "blown_bottle",
    "shakuhachi",
    "whistle",
    "ocarina",
    // Synth lead
    "lead_1_square",
    "lead_2_sawtooth",
    "lead_3_calliope",
    "lead_4_chiff",
    "lead_5_charang",
    "lead_6_voice",
    "lead_7_fifths",
    "lead_8_bass_lead",
    // Synth pad
    "pad_1_new_age",
    "pad_2_warm",
    "pad_3_polysynth",
    "pad_4_choir",
    "pad_5_bowed",
    "pad_6_metallic",
    "pad_7_halo",
    "pad_8_sweep",
    // Synth effects
    "fx_1_rain",
    "fx_2_soundtrack",
    "fx_3_crystal",
    "fx_4_atmosphere",
    "fx_5_brightness",
    "fx_6_goblins",
    "fx_7_echoes",
    "fx_8_sci_fi",
    // Ethnic
    "sitar",
    "banjo",
    "shamisen",
    "koto",
    "kalimba",
    "bag_pipe",
    "fiddle",
    "shanai",
    // Percussive
    "tinkle_bell",
    "agogo",
    "steel_drums",
    "woodblock",
    "taiko_drum",
    "melodic_tom",
    "synth_drum",
    "reverse_cymbal",
    // Sound effects
    "guitar_fret_noise",
    "breath_noise",
    "seashore",
    "bird_tweet",
    "telephone_ring",
    "helicopter",
    "applause",
    "gunshot",
];

/// A General MIDI instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instrument {
    /// 1-based program number
    pub program: u8,
    pub name: &'static str,
    pub family: InstrumentFamily,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.program)
    }
}

/// Instrument for a 1-based program number
pub fn instrument(program: u8) -> Option<Instrument> {
    let family = InstrumentFamily::of_program(program)?;
    Some(Instrument {
        program,
        name: PROGRAM_NAMES[program as usize - 1],
        family,
    })
}

/// Instrument by snake_case name (e.g. "lead_1_square"), case-insensitive
pub fn by_name(name: &str) -> Result<Instrument> {
    let wanted = name.trim().to_lowercase().replace([' ', '-'], "_");
    PROGRAM_NAMES
        .iter()
        .position(|&n| n == wanted)
        .and_then(|i| instrument(i as u8 + 1))
        .ok_or_else(|| RandsikError::option("program", format!("unknown instrument {:?}", name)))
}

/// Every instrument in program order
pub fn all() -> impl Iterator<Item = Instrument> {
    (1..=128u8).filter_map(instrument)
}

/// Program given as a number or an instrument name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramSpec {
    Number(u8),
    Name(String),
}

impl ProgramSpec {
    /// Resolve to a 1-based program number
    pub fn resolve(&self) -> Result<u8> {
        match self {
            ProgramSpec::Number(program) => instrument(*program)
                .map(|i| i.program)
                .ok_or_else(|| RandsikError::option("program", format!("{} is not in 1-128", program))),
            ProgramSpec::Name(name) => by_name(name).map(|i| i.program),
        }
    }
}

impl Default for ProgramSpec {
    fn default() -> Self {
        ProgramSpec::Number(1)
    }
}

impl From<u8> for ProgramSpec {
    fn from(program: u8) -> Self {
        ProgramSpec::Number(program)
    }
}

impl From<String> for ProgramSpec {
    fn from(name: String) -> Self {
        ProgramSpec::Name(name)
    }
}

impl From<&str> for ProgramSpec {
    fn from(name: &str) -> Self {
        ProgramSpec::Name(name.to_string())
    }
}
