use anyhow::Context;
use clap::{Parser, Subcommand};
use digest_lib::constants::{DEFAULT_K, DEFAULT_MOD, DEFAULT_WINDOW};
use digest_lib::flat;
use needletail::parse_fastx_file;
use std::io::{BufWriter, Write};
use tracing::info;

#[derive(Parser)]
#[command(name = "digest")]
#[command(version = "0.1.0")]
#[command(about = "Sub-sample k-mer positions from FASTA/FASTQ sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Window minimizers: the smallest k-mer of every window of w k-mers
    Window {
        /// Input FASTA/FASTQ file (optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// K-mer length
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,

        /// Window width, in k-mers
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Also print the 32-bit hash of each emission
        #[arg(long, default_value = "false")]
        include_hash: bool,

        /// Number of worker threads per sequence
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },

    /// Mod-minimizers: k-mers whose hash is 0 modulo the modulus
    Mod {
        /// Input FASTA/FASTQ file (optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// K-mer length
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,

        /// Modulus
        #[arg(short, long, default_value_t = DEFAULT_MOD)]
        modulus: u32,

        /// Also print the 32-bit hash of each emission
        #[arg(long, default_value = "false")]
        include_hash: bool,

        /// Number of worker threads per sequence
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },

    /// Syncmers: windows whose smallest k-mer sits at either window edge
    Sync {
        /// Input FASTA/FASTQ file (optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// K-mer length
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,

        /// Window width, in k-mers
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Also print the 32-bit hash of each emission
        #[arg(long, default_value = "false")]
        include_hash: bool,

        /// Number of worker threads per sequence
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Window { input, k, window, include_hash, threads } => {
            digest_file(&input, |seq| {
                if include_hash {
                    flat::window_minimizer_with_hashes(seq, k, window, threads).map(Emissions::Pairs)
                } else {
                    flat::window_minimizer(seq, k, window, threads).map(Emissions::Positions)
                }
            })
        }
        Commands::Mod { input, k, modulus, include_hash, threads } => {
            digest_file(&input, |seq| {
                if include_hash {
                    flat::modimizer_with_hashes(seq, k, modulus, threads).map(Emissions::Pairs)
                } else {
                    flat::modimizer(seq, k, modulus, threads).map(Emissions::Positions)
                }
            })
        }
        Commands::Sync { input, k, window, include_hash, threads } => {
            digest_file(&input, |seq| {
                if include_hash {
                    flat::syncmer_with_hashes(seq, k, window, threads).map(Emissions::Pairs)
                } else {
                    flat::syncmer(seq, k, window, threads).map(Emissions::Positions)
                }
            })
        }
    }
}

enum Emissions {
    Positions(Vec<u32>),
    Pairs(Vec<(u32, u32)>),
}

/// Run one digestion scheme over every record of a FASTA/FASTQ file,
/// writing `record_id\tposition[\thash]` lines to stdout.
fn digest_file<F>(input: &str, digest: F) -> anyhow::Result<()>
where
    F: Fn(&[u8]) -> digest_lib::Result<Emissions>,
{
    let mut reader =
        parse_fastx_file(input).with_context(|| format!("failed to open {}", input))?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut records = 0usize;
    let mut emissions = 0usize;
    while let Some(record) = reader.next() {
        let record = record.context("malformed input record")?;
        let id = String::from_utf8_lossy(record.id()).into_owned();
        let seq = record.seq();

        match digest(&seq[..]).with_context(|| format!("digestion failed for record {}", id))? {
            Emissions::Positions(positions) => {
                emissions += positions.len();
                for p in positions {
                    writeln!(out, "{}\t{}", id, p)?;
                }
            }
            Emissions::Pairs(pairs) => {
                emissions += pairs.len();
                for (p, h) in pairs {
                    writeln!(out, "{}\t{}\t{}", id, p, h)?;
                }
            }
        }
        records += 1;
    }
    out.flush()?;
    info!(records, emissions, "digestion complete");
    Ok(())
}
