//! Text reports for committed peaks and unclustered sequences.
//!
//! Row layout is fixed-width: peak rank padded to 5, member rank to 10, the
//! sequence to `len(center) + dist_cutoff + 10`, then abundance, frequency
//! and distance padded to 20 each, then `st=<status>`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::{ClusterError, Result};
use crate::greedy::{ClusterOptions, ClusterResult, PeakMember};

pub const PEAKS_HEADER: &str =
    "peak_rank / sequence_rank / sequence / abundance / frequency / distance to center / status";
pub const NOPEAKS_HEADER: &str =
    "sequence_rank / sequence / abundance / frequency / distance to center / status";

/// Locations of the report files for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPaths {
    pub dir: PathBuf,
    pub peaks: PathBuf,
    /// Only set when unclustered output is requested.
    pub nopeaks: Option<PathBuf>,
}

impl ReportPaths {
    /// `<out_dir>/e<d>/<stem>_e<d>_ms<n>_ma<a>_mac<c>_<rec|norec>_{peaks,nopeaks}.txt`,
    /// where `<stem>` is the input file name up to its first `.`.
    pub fn new(input: &Path, out_dir: &Path, opts: &ClusterOptions) -> Self {
        let stem = input
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("counts");
        let dir = out_dir.join(format!("e{}", opts.dist_cutoff));
        let base = format!(
            "{}_e{}_ms{}_ma{}_mac{}_{}",
            stem,
            opts.dist_cutoff,
            opts.min_seqs,
            opts.min_abd,
            opts.min_abd_center,
            if opts.allow_recycle { "rec" } else { "norec" }
        );
        let peaks = dir.join(format!("{}_peaks.txt", base));
        let nopeaks = opts
            .keep_unclustered
            .then(|| dir.join(format!("{}_nopeaks.txt", base)));
        Self {
            dir,
            peaks,
            nopeaks,
        }
    }
}

fn format_freq(freq: f64) -> String {
    format!("{:.4}", freq)
}

fn write_member_row<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    member: &PeakMember,
    seq_width: usize,
) -> std::io::Result<()> {
    let rec = catalog.get(member.id);
    writeln!(
        out,
        "{:<sw$}{:<20}{:<20}{:<20}st={}",
        rec.sequence(),
        rec.abundance(),
        format_freq(catalog.frequency_of(member.id)),
        member.distance,
        member.status.code(),
        sw = seq_width
    )
}

fn seq_width(catalog: &Catalog, center: &PeakMember, opts: &ClusterOptions) -> usize {
    catalog.get(center.id).len() + opts.dist_cutoff as usize + 10
}

/// Write every committed peak.
pub fn write_peaks<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    result: &ClusterResult,
    opts: &ClusterOptions,
) -> std::io::Result<()> {
    writeln!(out, "{}", PEAKS_HEADER)?;
    for peak in &result.peaks {
        let Some(center) = peak.center() else {
            continue;
        };
        writeln!(out, "---------- peak = {}----------", peak.rank)?;
        writeln!(out)?;
        let width = seq_width(catalog, center, opts);
        for member in &peak.members {
            write!(out, "{:<5}{:<10}", peak.rank, member.local_rank)?;
            write_member_row(out, catalog, member, width)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write rejected peaks (center first, then its candidates) followed by the
/// leftover sequences. Rejected rows carry their rank inside the rejected
/// peak, counted from 1 at the center.
pub fn write_nopeaks<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    result: &ClusterResult,
    opts: &ClusterOptions,
) -> std::io::Result<()> {
    writeln!(out, "{}", NOPEAKS_HEADER)?;
    for rejected in &result.rejected {
        let Some(center) = rejected.members.first() else {
            continue;
        };
        let width = seq_width(catalog, center, opts);
        for member in &rejected.members {
            write!(out, "{:<10}", member.local_rank)?;
            write_member_row(out, catalog, member, width)?;
        }
    }
    for &id in &result.leftovers {
        let rec = catalog.get(id);
        writeln!(
            out,
            "{}\t{}\t{}\t-\t-",
            rec.sequence(),
            rec.abundance(),
            format_freq(catalog.frequency_of(id))
        )?;
    }
    Ok(())
}

/// Create the output directory and write the report files.
pub fn write_reports(
    paths: &ReportPaths,
    catalog: &Catalog,
    result: &ClusterResult,
    opts: &ClusterOptions,
) -> Result<()> {
    fs::create_dir_all(&paths.dir)
        .map_err(|e| ClusterError::io(&paths.dir, "create directory", e))?;

    write_file(&paths.peaks, |w| write_peaks(w, catalog, result, opts))?;
    if let Some(nopeaks) = &paths.nopeaks {
        write_file(nopeaks, |w| write_nopeaks(w, catalog, result, opts))?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| ClusterError::io(path, "create", e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(|e| ClusterError::io(path, "write", e))?;
    writer
        .flush()
        .map_err(|e| ClusterError::io(path, "write", e))
}
