//! Shardkeep: split a secret into shard files, join them back
//!
//! Thin I/O around `shardkeep-core`: argument parsing, prompting, config,
//! logging and the shard file store.
//!
//! # Usage
//!
//! ```bash
//! shardkeep --split -s "hunter2" -n 5 -m 3 -o vault
//! shardkeep --join vault/1_*.json vault/2_*.json vault/4_*.json
//! shardkeep --version
//! ```

mod cli;
mod config;
mod hardening;

use anyhow::{Context, Result};
use shardkeep_core::{Engine, EngineConfig, ShardkeepError, SplitConfig};
use shardkeep_store::FileStore;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

use cli::{Command, SplitArgs};
use config::CliConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = cli::parse_args(&args)?;

    match cli.command {
        Command::Help => {
            cli::print_help();
            return Ok(());
        }
        Command::Version => {
            println!("shardkeep {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Load config
    let mut config = match &cli.config_path {
        Some(path) => CliConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CliConfig::default(),
    };

    // Apply env overrides
    config.apply_env_overrides();
    config.validate().context("Invalid configuration")?;

    // Init logger
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level()?
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();

    // Keep secrets off disk if we crash
    hardening::disable_core_dumps();

    let engine = Engine::new(EngineConfig::new(config.modulus()?));

    match cli.command {
        Command::Split(args) => split(&engine, &config, args),
        Command::Join { files } => join(&engine, &files),
        Command::Help | Command::Version => Ok(()),
    }
}

fn split(engine: &Engine, config: &CliConfig, args: SplitArgs) -> Result<()> {
    let defaults = config.split_config();
    let pool = SplitConfig {
        minimum: args.minimum.unwrap_or(defaults.minimum),
        total: args.total.unwrap_or(defaults.total),
    };
    pool.validate().context("Invalid shard counts")?;

    let secret = match args.secret {
        Some(secret) => secret,
        None => prompt_secret()?,
    };

    let records = engine.split(&secret, &pool).map_err(|e| match e {
        ShardkeepError::SecretTooLarge { .. } => anyhow::Error::new(e).context(format!(
            "Secrets are limited to {} bytes with modulus {}; try --config with a larger modulus",
            engine.max_secret_bytes(),
            config.sharing.modulus
        )),
        other => anyhow::Error::new(other).context("Failed to split secret"),
    })?;

    let dir: PathBuf = args.output_dir.unwrap_or_else(|| config.output.dir.clone());
    let store = FileStore::new(&dir)
        .with_context(|| format!("Failed to open output directory {}", dir.display()))?;
    let paths = store.save_all(&records).context("Failed to write shard files")?;

    for path in &paths {
        println!("{}", path.display());
    }
    log::info!(
        "wrote {} shards to {}, any {} recover the secret",
        paths.len(),
        dir.display(),
        pool.minimum
    );
    Ok(())
}

fn join(engine: &Engine, files: &[PathBuf]) -> Result<()> {
    let records = shardkeep_store::load_all(files).context("Failed to read shard files")?;
    let secret = Zeroizing::new(
        engine
            .join(&records)
            .context("Failed to recover secret")?,
    );
    println!("{}", secret.as_str());
    Ok(())
}

fn prompt_secret() -> Result<Zeroizing<String>> {
    eprintln!("Please provide the secret to split:");
    io::stderr().flush().ok();

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read secret from stdin")?;

    let trimmed = line.trim_end_matches(['\r', '\n']);
    Ok(Zeroizing::new(trimmed.to_string()))
}
