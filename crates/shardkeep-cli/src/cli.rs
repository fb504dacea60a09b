//! Command-line parsing (minimal, no clap dependency needed)

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use zeroize::Zeroizing;

/// What the user asked for
pub enum Command {
    Split(SplitArgs),
    Join { files: Vec<PathBuf> },
    Version,
    Help,
}

/// `--split` options; unset values fall back to the configuration
#[derive(Default)]
pub struct SplitArgs {
    pub secret: Option<Zeroizing<String>>,
    pub total: Option<u32>,
    pub minimum: Option<u32>,
    pub output_dir: Option<PathBuf>,
}

/// Parsed command line
pub struct Cli {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

fn value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.clone()),
        None => bail!("{} requires a value", flag),
    }
}

fn count(args: &[String], i: &mut usize, flag: &str) -> Result<u32> {
    let raw = value(args, i, flag)?;
    raw.parse::<u32>()
        .with_context(|| format!("{} expects a positive number, got {:?}", flag, raw))
}

/// Parse arguments, excluding the program name
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut split = false;
    let mut join = false;
    let mut version = false;
    let mut help = false;
    let mut verbose = false;
    let mut config_path = None;
    let mut split_args = SplitArgs::default();
    let mut files = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--split" => split = true,
            "--join" => join = true,
            "-s" | "--secret" => {
                split_args.secret = Some(Zeroizing::new(value(args, &mut i, "--secret")?));
            }
            "-n" | "--num-shards" => {
                split_args.total = Some(count(args, &mut i, "--num-shards")?);
            }
            "-m" | "--min-shards" => {
                split_args.minimum = Some(count(args, &mut i, "--min-shards")?);
            }
            "-o" | "--output-dir" => {
                split_args.output_dir = Some(PathBuf::from(value(args, &mut i, "--output-dir")?));
            }
            "-S" | "--shard-files" => {
                // Greedy: everything up to the next flag
                while args.get(i + 1).is_some_and(|a| !a.starts_with('-')) {
                    i += 1;
                    files.push(PathBuf::from(&args[i]));
                }
            }
            "-c" | "--config" => {
                config_path = Some(PathBuf::from(value(args, &mut i, "--config")?));
            }
            "-v" | "--verbose" => verbose = true,
            "-V" | "--version" => version = true,
            "-h" | "--help" => help = true,
            other if other.starts_with('-') => bail!("Unknown argument: {}", other),
            path => files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    let command = if help {
        Command::Help
    } else if version {
        Command::Version
    } else {
        match (split, join) {
            (true, true) => bail!("--split and --join are mutually exclusive"),
            (false, false) => bail!("Nothing to do: pass --split or --join (see --help)"),
            (true, false) => {
                if !files.is_empty() {
                    bail!("Shard files are only read by --join");
                }
                Command::Split(split_args)
            }
            (false, true) => {
                if split_args.secret.is_some() {
                    bail!("--secret only applies to --split");
                }
                if files.len() < 2 {
                    bail!(
                        "--join needs at least 2 shard files, got {}",
                        files.len()
                    );
                }
                Command::Join { files }
            }
        }
    };

    Ok(Cli {
        command,
        config_path,
        verbose,
    })
}

pub fn print_help() {
    println!(
        r#"Shardkeep - threshold secret sharing over a prime field

USAGE:
    shardkeep --split [-s <SECRET>] [-n <TOTAL>] [-m <MIN>] [-o <DIR>]
    shardkeep --join <FILE> <FILE>...
    shardkeep --join -S <FILE> <FILE>...

OPTIONS:
    --split                   Split a secret into shard files
    --join                    Recover a secret from shard files
    -s, --secret <SECRET>     Secret to split (prompted for when omitted)
    -n, --num-shards <N>      Shards to create (default: 5)
    -m, --min-shards <M>      Shards needed to recover (default: 3)
    -o, --output-dir <DIR>    Where shard files are written (default: .)
    -S, --shard-files <FILE>  Shard files to join
    -c, --config <PATH>       TOML config file
    -v, --verbose             Debug logging
    -h, --help                Show this help message
    -V, --version             Show version

ENVIRONMENT VARIABLES (override config file):
    SHARDKEEP_TOTAL_SHARDS    Shards to create
    SHARDKEEP_MIN_SHARDS      Shards needed to recover
    SHARDKEEP_MODULUS         Field modulus (mersenne127/mersenne521)
    SHARDKEEP_OUTPUT_DIR      Output directory
    SHARDKEEP_LOG_LEVEL       Log level (error/warn/info/debug/trace)

EXAMPLES:
    # 3-of-5 split into ./vault
    shardkeep --split -s "hunter2" -o vault

    # Recover from any three shards
    shardkeep --join vault/1_*.json vault/3_*.json vault/5_*.json
"#
    );
}
