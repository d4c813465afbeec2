use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use uniqueness::compare::compare;
use uniqueness::logs::read_log_file;
use uniqueness::{check_uniqueness, BloomFilter};

#[derive(Parser, Debug)]
#[command(about = "Approximate uniqueness checks and distinct counts in bounded memory.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts distinct client addresses in an access log, exactly and with HyperLogLog.
    Ips {
        /// Access log with one JSON record or plain-text entry per line.
        log_file: PathBuf,
        /// HyperLogLog precision; the estimator uses 2^precision registers.
        #[arg(short, long, default_value_t = 14)]
        precision: u8,
    },
    /// Reports which candidate passwords are already known.
    Passwords {
        /// Bloom filter size in bits.
        #[arg(short, long, default_value_t = 1000)]
        size: usize,
        /// Number of hash functions per item.
        #[arg(short = 'k', long, default_value_t = 3)]
        hashes: usize,
        /// Known passwords, comma separated.
        #[arg(short, long, value_delimiter = ',')]
        existing: Vec<String>,
        /// Passwords to check, comma separated.
        #[arg(short, long, value_delimiter = ',', required = true)]
        check: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().command {
        Command::Ips {
            log_file,
            precision,
        } => {
            let log = read_log_file(&log_file)?;
            let comparison = compare(&log.lines, precision)?;
            if comparison.exact.tally.distinct == 0 {
                warn!(path = %log_file.display(), "no IP addresses found");
                return Ok(());
            }
            println!("{}", comparison.table());
        }
        Command::Passwords {
            size,
            hashes,
            existing,
            check,
        } => {
            let mut filter = BloomFilter::new(size, hashes)?;
            for password in &existing {
                filter
                    .add(password)
                    .with_context(|| format!("cannot add password {password:?}"))?;
            }
            for (password, status) in check_uniqueness(&filter, &check)? {
                println!("Password '{password}' - {status}.");
            }
        }
    }
    Ok(())
}
