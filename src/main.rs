// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use randsik::music::{instrument, mode};
use randsik::{generate_pattern, GenerateOptions, MidiExporter, Pattern, PatternFile};
use std::env;
use tracing::info;

const DEFAULT_OUTPUT: &str = "randsik.mid";

fn print_usage() {
    println!("randsik - Random MIDI Pattern Generator");
    println!();
    println!("Usage: randsik <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  generate                Generate one random pattern");
    println!("  render <FILE>           Render every pattern in a YAML pattern file");
    println!("  modes                   List available modes");
    println!("  instruments             List General MIDI instruments");
    println!();
    println!("Generate options:");
    println!("  --note <NAME>           Starting pitch, e.g. C4 (random if omitted)");
    println!("  --mode <NAME>           Mode name (random diatonic mode if omitted)");
    println!("  --octaves <N>           Octave span of the pitch range (default 1)");
    println!("  --measures <N>          Measures to fill (default 1)");
    println!("  --time-sig <S>          Time signature (default 4/4)");
    println!("  --degrees <LIST>        Comma-separated scale degrees, e.g. 1,5,7");
    println!("  --lengths <LIST>        Comma-separated note lengths in pulses");
    println!("  --tempo <BPM>           Tempo (default 120)");
    println!("  --velocity <N>          Velocity 0-127 (default 127)");
    println!("  --channel <N>           MIDI channel 0-15 (default 0)");
    println!("  --program <P>           Program number 1-128 or instrument name");
    println!();
    println!("Common options:");
    println!("  --seed <N>              Seed the random generator");
    println!("  --out <FILE>            Output MIDI file (default {})", DEFAULT_OUTPUT);
    println!("  --help                  Show this help message");
}

/// Value following a flag
fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid value for {}: {}", flag, value))
}

fn parse_list<T: std::str::FromStr>(value: &str, flag: &str) -> Result<Vec<T>> {
    value
        .split(',')
        .map(|item| parse_number(item.trim(), flag))
        .collect()
}

/// Options shared by every command
#[derive(Debug, Default)]
struct CommonArgs {
    seed: Option<u64>,
    out: Option<String>,
}

impl CommonArgs {
    /// Consume a common flag, returning false if `flag` is not one
    fn accept(&mut self, args: &[String], index: usize, flag: &str) -> Result<bool> {
        match flag {
            "--seed" => self.seed = Some(parse_number(flag_value(args, index, flag)?, flag)?),
            "--out" => self.out = Some(flag_value(args, index, flag)?.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_generate_args(args: &[String]) -> Result<(GenerateOptions, CommonArgs)> {
    let mut options = GenerateOptions::new();
    let mut common = CommonArgs::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !common.accept(args, i, flag)? {
            let value = flag_value(args, i, flag)?;
            options = match flag {
                "--note" => options.with_note(value),
                "--mode" => options.with_mode(value),
                "--octaves" => options.with_octaves(parse_number(value, flag)?),
                "--measures" => options.with_measures(parse_number(value, flag)?),
                "--time-sig" => options.with_time_sig(value),
                "--degrees" => options.with_scale_degrees(parse_list(value, flag)?),
                "--lengths" => options.with_note_lengths(parse_list(value, flag)?),
                "--tempo" => options.with_tempo(parse_number(value, flag)?),
                "--velocity" => options.with_velocity(parse_number(value, flag)?),
                "--channel" => options.with_channel(parse_number(value, flag)?),
                "--program" => match value.parse::<u8>() {
                    Ok(number) => options.with_program(number),
                    Err(_) => options.with_program(value),
                },
                _ => bail!("Unknown option: {}", flag),
            };
        }
        i += 2;
    }

    Ok((options, common))
}

fn write_patterns(patterns: &[Pattern], path: &str) -> Result<()> {
    let mut exporter = MidiExporter::new();
    for pattern in patterns {
        pattern
            .append_to(&mut exporter)
            .with_context(|| format!("Failed to encode {}", pattern))?;
    }
    exporter
        .export(path)
        .with_context(|| format!("Failed to write MIDI file: {}", path))?;

    info!(path, tracks = exporter.track_count(), "MIDI file written");
    Ok(())
}

fn print_summary(patterns: &[Pattern], path: &str) {
    for (index, pattern) in patterns.iter().enumerate() {
        println!("Track {}: {}", index + 1, pattern);
        println!("  {} pulses, {} events", pattern.duration(), pattern.events().len());
    }
    println!("Wrote {}", path);
}

fn run_generate(args: &[String]) -> Result<()> {
    let (options, common) = parse_generate_args(args)?;
    let mut rng = common.rng();

    let pattern = generate_pattern(&options, &mut rng).context("Failed to generate pattern")?;
    let path = common.out.as_deref().unwrap_or(DEFAULT_OUTPUT);

    let patterns = [pattern];
    write_patterns(&patterns, path)?;
    print_summary(&patterns, path);
    Ok(())
}

fn run_render(args: &[String]) -> Result<()> {
    let Some(config_path) = args.first() else {
        bail!("render requires a pattern file");
    };

    let mut common = CommonArgs::default();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if !common.accept(args, i, flag)? {
            bail!("Unknown option: {}", flag);
        }
        i += 2;
    }

    let file = PatternFile::load(config_path)?;
    if file.patterns.is_empty() {
        bail!("{} defines no patterns", config_path);
    }
    info!(path = %config_path, patterns = file.patterns.len(), "Pattern file loaded");

    // Command line flags win over the file
    let seed = common.seed.or(file.seed);
    let mut rng = CommonArgs { seed, out: None }.rng();
    let patterns = file.render(&mut rng)?;

    let path = common
        .out
        .as_deref()
        .or(file.output.as_deref())
        .unwrap_or(DEFAULT_OUTPUT);
    write_patterns(&patterns, path)?;
    print_summary(&patterns, path);
    Ok(())
}

fn list_modes() {
    for name in mode::mode_names() {
        match mode::mode(name) {
            Ok(m) => {
                let steps: Vec<String> = m.steps.iter().map(u8::to_string).collect();
                println!("{:<12} {}", name, steps.join(" "));
            }
            Err(_) => println!("{:<12} all 128 pitches", name),
        }
    }
}

fn list_instruments() {
    let mut family = None;
    for inst in instrument::all() {
        if family != Some(inst.family) {
            family = Some(inst.family);
            println!("{}", inst.family);
        }
        println!("  {:>3} {}", inst.program, inst.name);
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("randsik - Random MIDI Pattern Generator");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "generate" => run_generate(&args[2..])?,
        "render" => run_render(&args[2..])?,
        "modes" => list_modes(),
        "instruments" => list_instruments(),
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
