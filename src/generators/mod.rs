// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engines for algorithmic pattern creation.
//!
//! [`generate_pattern`] is the main entry point: it resolves the options,
//! draws a sequence with [`PatternGenerator`] and renders it into a
//! [`Pattern`].

pub mod options;
pub mod random;

pub use options::GenerateOptions;
pub use random::{PatternGenerator, MID_RANGE};

use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::pattern::Pattern;

/// Generate a random pattern and render its events.
///
/// Pass a seeded RNG (e.g. `StdRng::seed_from_u64`) to reproduce a
/// pattern exactly.
pub fn generate_pattern<R>(options: &GenerateOptions, rng: &mut R) -> Result<Pattern>
where
    R: Rng + ?Sized,
{
    let sequence = PatternGenerator::new().generate(options, rng)?;
    let program = options.program.resolve()?;
    let pattern = Pattern::new(sequence, options.tempo, program, options.channel)?;

    debug!(
        notes = pattern.sequence().len(),
        events = pattern.events().len(),
        "Pattern rendered"
    );

    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Event;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_pattern_header_events() {
        let opts = GenerateOptions::new()
            .with_note("C4")
            .with_mode("lydian")
            .with_tempo(90.0)
            .with_channel(2)
            .with_program("lead_2_sawtooth".to_string());
        let pattern = generate_pattern(&opts, &mut StdRng::seed_from_u64(11)).unwrap();

        assert_eq!(pattern.program(), 82);
        assert_eq!(pattern.channel(), 2);
        assert_eq!(
            pattern.events()[0],
            Event::ProgramChange { channel: 2, program: 81 }
        );
        assert_eq!(
            pattern.events()[1],
            Event::SetTempo { micros_per_beat: 666_667 }
        );
    }

    #[test]
    fn test_generated_events_pair_up() {
        let opts = GenerateOptions::new().with_measures(2);
        let pattern = generate_pattern(&opts, &mut StdRng::seed_from_u64(3)).unwrap();

        let notes = pattern.sequence().len();
        assert_eq!(pattern.events().len(), 2 + notes * 2);
        assert_eq!(pattern.duration(), 3840);

        // Generated sequences have no rests, so every start is immediate
        for event in &pattern.events()[2..] {
            if let Event::NoteStart { delta, .. } = event {
                assert_eq!(*delta, 0);
            }
        }
    }
}
