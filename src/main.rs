use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use clusterboss::logging::init_logger;
use clusterboss::{load_counts, write_reports, ClusterOptions, GreedyClusterer, ReportPaths};

#[derive(Parser)]
#[command(name = "clusterboss")]
#[command(about = "Cluster selection-experiment sequence counts into peaks of edit-distance similarity")]
#[command(
    long_about = "Clusters a galaxy-type count file into peaks.

INPUT FORMAT:
  Three header lines (unique sequences, total molecules, blank line), then one
  'sequence abundance' pair per line.

OUTPUT:
  <out-dir>/e<d>/<input>_e<d>_ms<n>_ma<a>_mac<c>_<rec|norec>_peaks.txt
  <out-dir>/e<d>/<input>_e<d>_ms<n>_ma<a>_mac<c>_<rec|norec>_nopeaks.txt  (--keep-not-clustered)"
)]
#[command(after_help = "EXAMPLES:
  # Cutoff distance 3, centers need at least 10 molecules
  clusterboss round5.txt -d 3 -n 1 -a 1 -c 10

  # Let sequences join several peaks and keep unclustered sequences
  clusterboss round5.txt -d 2 -n 5 -c 100 --recycle --keep-not-clustered")]
struct Cli {
    /// Count file (galaxy-type, 3 header lines)
    input: PathBuf,

    /// Cutoff edit distance used to cluster
    #[arg(short = 'd', long, default_value_t = 3)]
    dist_cutoff: u32,

    /// Minimum number of sequences per peak, center included
    #[arg(short = 'n', long, default_value_t = 1)]
    min_seqs: usize,

    /// Minimum abundance of sequences included in peaks
    #[arg(short = 'a', long, default_value_t = 1)]
    min_abd: u64,

    /// Minimum abundance of center sequences
    #[arg(short = 'c', long, default_value_t = 10)]
    min_abd_center: u64,

    /// Allow a sequence to be used in more than one peak
    #[arg(long)]
    recycle: bool,

    /// Also write a file with the sequences left out of every peak
    #[arg(long)]
    keep_not_clustered: bool,

    /// Evaluate candidate distances in parallel (needs the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Directory under which the e<d>/ output directory is created
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Enable verbose progress output with timestamps
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ClusterOptions {
        ClusterOptions {
            dist_cutoff: self.dist_cutoff,
            min_seqs: self.min_seqs,
            min_abd: self.min_abd,
            min_abd_center: self.min_abd_center,
            allow_recycle: self.recycle,
            keep_unclustered: self.keep_not_clustered,
            parallel_dist_checks: self.parallel,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "required"
    } else {
        "not required"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let opts = cli.options();
    info!("Parameters:");
    info!("Input file: {}", cli.input.display());
    info!("Cutoff distance: {}", opts.dist_cutoff);
    info!("Minimum number of sequences per peak: {}", opts.min_seqs);
    info!("Minimum abundance of sequences in peaks: {}", opts.min_abd);
    info!("Minimum abundance of center sequences: {}", opts.min_abd_center);
    info!("Recycle: {}", yes_no(opts.allow_recycle));
    info!(
        "Generate file with unclustered sequences: {}",
        yes_no(opts.keep_unclustered)
    );

    opts.validate().context("Invalid clustering parameters")?;

    info!("Reading input counts file ...");
    let table = load_counts(&cli.input)
        .with_context(|| format!("Failed to read counts from {}", cli.input.display()))?;
    let mut catalog = table
        .into_catalog()
        .with_context(|| format!("Invalid records in {}", cli.input.display()))?;

    info!("Clustering sequences ...");
    let result = GreedyClusterer::new(&mut catalog, opts.clone()).run()?;

    let paths = ReportPaths::new(&cli.input, &cli.out_dir, &opts);
    write_reports(&paths, &catalog, &result, &opts).context("Failed to write reports")?;
    info!("Peaks written to {}", paths.peaks.display());

    println!("Finished clustering sequences.");
    println!(
        "There are {} different sequences in {}",
        catalog.len(),
        cli.input.display()
    );
    println!("Clustering resulted in {} peaks.", result.peaks.len());

    Ok(())
}
