//! Password generator CLI
//!
//! Prints one password per line on stdout. Diagnostics go to stderr and
//! are controlled with `RUST_LOG` (default `warn`).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pwforge::{CharSet, GenerationProfile, GeneratorType, PasswordError, ProfileError};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(name = "pwforge", version, about = "Generate passwords from character sets or patterns")]
struct Args {
    /// TOML profile to start from
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Password length (character-set mode)
    #[arg(short, long, conflicts_with = "pattern")]
    length: Option<u32>,

    /// Base character set: class letters, `\X` for a literal X
    #[arg(short, long, value_name = "CLASSES", conflicts_with = "pattern")]
    charset: Option<String>,

    /// Pattern template (pattern mode)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Shuffle the pattern output
    #[arg(long)]
    permute: bool,

    /// Leave out O0Il1|
    #[arg(long)]
    exclude_look_alike: bool,

    /// Never repeat a character
    #[arg(long)]
    no_repeat: bool,

    /// Characters to leave out
    #[arg(long, value_name = "CHARS")]
    exclude: Option<String>,

    /// Extra entropy mixed into the random engine
    #[arg(long, value_name = "TEXT")]
    entropy: Option<String>,

    /// Number of passwords to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = Args::parse();
    debug!("pwforge v{}", pwforge::VERSION);

    match run(&mut args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &mut Args) -> Result<(), CliError> {
    let profile = build_profile(args)?;

    if profile.has_security_reducing_option() {
        info!("Profile options reduce the number of possible passwords");
    }

    let entropy = take_entropy(args, profile.collect_user_entropy)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..args.count {
        let secret = pwforge::generate_checked(&profile, &entropy, None)?;
        writeln!(out, "{}", secret.expose())?;
    }
    out.flush()?;

    Ok(())
}

/// Loads the profile file, if any, and applies command-line overrides.
fn build_profile(args: &Args) -> Result<GenerationProfile, ProfileError> {
    let mut profile = match &args.profile {
        Some(path) => GenerationProfile::from_file(path)?,
        None => GenerationProfile::default(),
    };

    if let Some(pattern) = &args.pattern {
        profile.generator_type = GeneratorType::Pattern;
        profile.pattern = pattern.clone();
    }
    if let Some(length) = args.length {
        profile.generator_type = GeneratorType::CharSet;
        profile.length = length;
    }
    if let Some(classes) = &args.charset {
        profile.generator_type = GeneratorType::CharSet;
        profile.set_char_set(&parse_charset(classes));
    }
    if let Some(exclude) = &args.exclude {
        profile.exclude_characters = exclude.clone();
    }
    profile.permute_result |= args.permute;
    profile.exclude_look_alike |= args.exclude_look_alike;
    profile.no_repeating_characters |= args.no_repeat;

    Ok(profile)
}

/// Builds a set from class letters and escaped literals.
fn parse_charset(classes: &str) -> CharSet {
    let mut set = CharSet::new();
    let mut chars = classes.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            set.add(chars.next().unwrap_or('\\'));
        } else if !set.add_class(ch) {
            set.add(ch);
        }
    }
    set
}

/// Moves `--entropy` out of `args` so only the wiped buffer holds it.
/// Falls back to stdin when `collect` is set.
fn take_entropy(args: &mut Args, collect: bool) -> io::Result<Zeroizing<Vec<u8>>> {
    match args.entropy.take() {
        Some(text) => Ok(Zeroizing::new(text.into_bytes())),
        None if collect => read_entropy(),
        None => Ok(Zeroizing::new(Vec::new())),
    }
}

fn read_entropy() -> io::Result<Zeroizing<Vec<u8>>> {
    eprint!("Type some random text, then press Enter: ");
    io::stderr().flush()?;

    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;
    Ok(Zeroizing::new(line.trim_end().as_bytes().to_vec()))
}
