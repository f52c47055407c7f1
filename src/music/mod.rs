// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for randsik.
//!
//! This module provides the pitch table, the mode registry with its
//! scale walker, and the General MIDI instrument catalog.

pub mod instrument;
pub mod mode;
pub mod pitch;

pub use instrument::{Instrument, InstrumentFamily, ProgramSpec};
pub use mode::{derive, Mode, ScaleWalker, CHROMATIC, DOWNWARD_FLOOR, MODES};
pub use pitch::{lookup, PitchValue};
