// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! Note lengths are counted in pulses, with 480 pulses to the quarter
//! note. Each rung of the ladder halves the one above it.

pub mod signature;

pub use signature::{time_sig_to_pulses, TimeSignature};

/// Pulses Per Quarter Note used for every duration and exported file
pub const PPQN: u32 = 480;

pub const WHOLE: u32 = 1920;
pub const HALF: u32 = 960;
pub const QUARTER: u32 = 480;
pub const EIGHTH: u32 = 240;
pub const SIXTEENTH: u32 = 120;
pub const THIRTY_SECOND: u32 = 60;

/// Default note lengths for generated patterns
pub const DEFAULT_NOTE_LENGTHS: [u32; 3] = [QUARTER, EIGHTH, SIXTEENTH];
