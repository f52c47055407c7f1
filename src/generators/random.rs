// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Random scale-constrained pattern generator.
//!
//! Draws a pitch from the working pool and a length from the allowed
//! set until the measures are full. The last note is cut short so the
//! total lands exactly on the pulse budget.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use super::options::GenerateOptions;
use crate::error::{RandsikError, Result};
use crate::music::mode::{ScaleWalker, MODES};
use crate::music::pitch::{self, PitchValue};
use crate::pattern::{Element, Note};
use crate::timing::TimeSignature;

/// Starting pitches used when none is given (C3 to B4)
pub const MID_RANGE: std::ops::RangeInclusive<u8> = 48..=71;

/// Scale positions per octave of span
const POSITIONS_PER_OCTAVE: usize = 12;

/// Generates random note sequences within a mode
#[derive(Debug, Clone, Default)]
pub struct PatternGenerator {
    walker: ScaleWalker,
}

impl PatternGenerator {
    /// Create a generator with the default scale walker
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that walks scales with `walker`
    pub fn with_walker(walker: ScaleWalker) -> Self {
        Self { walker }
    }

    /// Generate a sequence of notes filling `measures` of `time_sig`.
    ///
    /// The same options and RNG state always give the same sequence.
    pub fn generate<R>(&self, options: &GenerateOptions, rng: &mut R) -> Result<Vec<Element>>
    where
        R: Rng + ?Sized,
    {
        options.validate()?;

        let start = resolve_start(options.note.as_deref(), rng)?;
        let mode = resolve_mode(options.mode.as_deref(), rng)?;
        let budget = TimeSignature::parse(&options.time_sig)?.pulses_per_measure()
            * options.measures as u64;

        let scale = self.walker.derive(&mode, start)?;
        let range = pitch_range(&scale, start, options.octaves)?;
        let pool = match &options.scale_degrees {
            Some(degrees) => select_degrees(range, degrees)?,
            None => range.to_vec(),
        };

        debug!(
            start = start.name(),
            mode = %mode,
            pool = pool.len(),
            budget,
            "Generating pattern"
        );

        fill_budget(&pool, &options.note_lengths, options.velocity, budget, rng)
    }
}

/// Look up the starting pitch, or pick one from [`MID_RANGE`]
fn resolve_start<R: Rng + ?Sized>(note: Option<&str>, rng: &mut R) -> Result<PitchValue> {
    match note {
        Some(name) => pitch::lookup(name),
        None => PitchValue::new(rng.gen_range(MID_RANGE) as i64),
    }
}

/// Use the given mode name, or pick a diatonic mode
fn resolve_mode<R: Rng + ?Sized>(mode: Option<&str>, rng: &mut R) -> Result<String> {
    match mode {
        Some(name) => Ok(name.to_string()),
        None => MODES
            .choose(rng)
            .map(|m| m.name.to_string())
            .ok_or_else(|| RandsikError::Internal("mode registry is empty".to_string())),
    }
}

/// The `12 * octaves` scale positions starting at the first `start`.
///
/// Stops early at the end of the list or at the top of the upward walk,
/// whichever comes first.
fn pitch_range(scale: &[PitchValue], start: PitchValue, octaves: u32) -> Result<&[PitchValue]> {
    let first = scale.iter().position(|&p| p == start).ok_or_else(|| {
        RandsikError::Internal(format!("start pitch {} missing from its own scale", start))
    })?;

    let top = scale[first..]
        .windows(2)
        .position(|w| w[1] <= w[0])
        .map_or(scale.len(), |i| first + i + 1);
    let end = (first + POSITIONS_PER_OCTAVE * octaves as usize).min(top);

    Ok(&scale[first..end])
}

/// Pick pitches by 1-based position within `range`
fn select_degrees(range: &[PitchValue], degrees: &[i64]) -> Result<Vec<PitchValue>> {
    degrees
        .iter()
        .map(|&degree| {
            if degree <= 0 || degree as usize > range.len() {
                return Err(RandsikError::InvalidScaleDegree {
                    degree,
                    available: range.len(),
                });
            }
            Ok(range[degree as usize - 1])
        })
        .collect()
}

fn fill_budget<R: Rng + ?Sized>(
    pool: &[PitchValue],
    lengths: &[u32],
    velocity: u8,
    budget: u64,
    rng: &mut R,
) -> Result<Vec<Element>> {
    if pool.is_empty() {
        return Err(RandsikError::Internal("pitch pool is empty".to_string()));
    }

    let mut sequence = Vec::new();
    let mut total = 0u64;

    while total < budget {
        let pitch = *pool
            .choose(rng)
            .ok_or_else(|| RandsikError::Internal("pitch pool is empty".to_string()))?;
        let mut length = *lengths
            .choose(rng)
            .ok_or_else(|| RandsikError::Internal("no note lengths".to_string()))?
            as u64;

        if total + length > budget {
            length = budget - total;
        }

        trace!(pitch = pitch.value(), length, total, "Note");
        sequence.push(Element::Note(Note::with_pitch(
            pitch,
            velocity as i64,
            length as i64,
        )?));
        total += length;
    }

    Ok(sequence)
}
