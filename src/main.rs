use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chimbreak::io::{read_fasta, read_gff, read_paf, write_breaks, write_fasta, write_gff};
use chimbreak::{BreakerConfig, ChimeraBreaker, FeatureStore};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chimbreak", about = "Break chimeric contigs using reference alignments")]
struct Cli {
    /// Contigs to examine (FASTA).
    contigs: PathBuf,
    /// Alignments of the contigs to the reference (PAF).
    alignments: PathBuf,
    /// Annotation of the contigs (GFF); breakpoints avoid its features.
    #[arg(long)]
    gff: Option<PathBuf>,
    /// Output directory.
    #[arg(short, long, default_value = "chimbreak_output")]
    output: PathBuf,
    /// Minimum alignment length to consider.
    #[arg(short = 'l', long, default_value_t = 10_000)]
    min_alignment_len: u32,
    /// Percentage of total covered length a chromosome must exceed.
    #[arg(short = 'p', long, default_value_t = 5.0)]
    min_ref_percent: f64,
    /// Covered reference bases a chromosome must exceed.
    #[arg(short = 'r', long, default_value_t = 100_000)]
    min_ref_bases: u64,
    /// Reference jump that flags an intrachromosomal misjoin.
    #[arg(short = 'd', long, default_value_t = 2_000_000)]
    intra_ref_gap: u64,
    /// Contig jump that flags an intrachromosomal misjoin.
    #[arg(short = 'c', long, default_value_t = 1_000_000)]
    intra_query_gap: u64,
    /// Skip the intrachromosomal pass.
    #[arg(long)]
    no_intra: bool,
    /// File listing contigs to leave untouched, one per line.
    #[arg(long)]
    ignore: Option<PathBuf>,
    /// Log debug detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = BreakerConfig::default()
        .with_min_alignment_len(cli.min_alignment_len)
        .with_significance(cli.min_ref_percent, cli.min_ref_bases)
        .with_intra_gaps(cli.intra_ref_gap, cli.intra_query_gap)
        .with_intrachromosomal(!cli.no_intra)
        .with_ignored(read_ignore_list(cli.ignore.as_deref())?);
    let breaker = ChimeraBreaker::new(config).context("invalid thresholds")?;

    let mut contigs = read_fasta(open(&cli.contigs)?)
        .with_context(|| format!("failed to read contigs from {}", cli.contigs.display()))?;
    let alignments = read_paf(BufReader::new(open(&cli.alignments)?)).with_context(|| {
        format!("failed to read alignments from {}", cli.alignments.display())
    })?;
    let mut annotation = match &cli.gff {
        Some(path) => Some(
            read_gff(BufReader::new(open(path)?))
                .with_context(|| format!("failed to read annotation from {}", path.display()))?,
        ),
        None => None,
    };
    info!(
        contigs = contigs.len(),
        aligned = alignments.len(),
        "inputs loaded"
    );
    for contig in &breaker.config().ignore {
        if !contigs.contains_key(contig) {
            warn!(%contig, "ignored contig not present in the assembly");
        }
    }

    let mut scratch = FeatureStore::new();
    let features = annotation
        .as_mut()
        .map_or(&mut scratch, |document| &mut document.features);
    let reports = breaker
        .process_all(&alignments, &mut contigs, features)
        .context("chimera breaking failed")?;

    fs::create_dir_all(&cli.output).with_context(|| {
        format!("failed to create output directory {}", cli.output.display())
    })?;

    let fasta_path = cli.output.join("broken.fa");
    write_fasta(BufWriter::new(create(&fasta_path)?), &contigs)
        .with_context(|| format!("failed to write {}", fasta_path.display()))?;

    if let Some(document) = &annotation {
        let gff_path = cli.output.join("broken.gff");
        write_gff(&mut BufWriter::new(create(&gff_path)?), document)
            .with_context(|| format!("failed to write {}", gff_path.display()))?;
    }

    let report_path = cli.output.join("breaks.tsv");
    write_breaks(&mut BufWriter::new(create(&report_path)?), &reports)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    info!(
        broken = reports.len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

fn read_ignore_list(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read ignore list {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
