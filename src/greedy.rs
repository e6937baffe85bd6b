use log::{debug, info, trace};

use crate::catalog::{Catalog, Status};
use crate::error::{ClusterError, Result};

/// Options controlling greedy peak clustering.
#[derive(Clone, Debug)]
pub struct ClusterOptions {
    /// Maximum edit distance (inclusive) between a center and a member.
    /// Sequences shorter than this can be neither center nor member.
    pub dist_cutoff: u32, // e.g., 3

    /// Minimum number of sequences per peak, center included.
    pub min_seqs: usize,

    /// Minimum abundance of a non-center member.
    pub min_abd: u64,

    /// Minimum abundance of a center.
    pub min_abd_center: u64, // e.g., 10

    /// If true, a sequence already accepted by one peak may join later peaks
    /// as a member (never as a center).
    pub allow_recycle: bool,

    /// If true, the result also lists rejected peaks and leftover sequences.
    pub keep_unclustered: bool,

    /// If enabled (feature `parallel`), evaluate candidate distances in parallel.
    pub parallel_dist_checks: bool,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            dist_cutoff: 3,
            min_seqs: 1,
            min_abd: 1,
            min_abd_center: 10,
            allow_recycle: false,
            keep_unclustered: false,
            parallel_dist_checks: false,
        }
    }
}

impl ClusterOptions {
    /// Check every parameter against its domain. Called before any record is
    /// touched, so an invalid run leaves the catalog untouched.
    pub fn validate(&self) -> Result<()> {
        if self.min_seqs == 0 {
            return Err(ClusterError::invalid_parameter(
                "min_seqs",
                self.min_seqs,
                "must be at least 1",
            ));
        }
        if self.min_abd == 0 {
            return Err(ClusterError::invalid_parameter(
                "min_abd",
                self.min_abd,
                "must be at least 1",
            ));
        }
        if self.min_abd_center == 0 {
            return Err(ClusterError::invalid_parameter(
                "min_abd_center",
                self.min_abd_center,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A sequence placed in a pending peak.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeakMember {
    /// Catalog index of the record.
    pub id: usize,
    /// 1-based position inside the peak; the center is 1.
    pub local_rank: usize,
    /// Edit distance to the peak's center.
    pub distance: u32,
    /// Status the record had when it was picked up by this peak.
    pub status: Status,
}

/// A committed peak: center first, then members in acceptance order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peak {
    /// 1-based, in commit order.
    pub rank: usize,
    pub members: Vec<PeakMember>,
}

impl Peak {
    /// The peak's center, `None` only for a hand-built empty peak.
    pub fn center(&self) -> Option<&PeakMember> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A pending peak that did not reach `min_seqs`. Status changes made while
/// building it are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedPeak {
    pub members: Vec<PeakMember>,
}

/// Result of greedy clustering.
#[derive(Clone, Debug, Default)]
pub struct ClusterResult {
    pub peaks: Vec<Peak>,
    /// Only filled when `keep_unclustered` is set.
    pub rejected: Vec<RejectedPeak>,
    /// Records still `Unassigned` after the pass, in ranked order.
    /// Only filled when `keep_unclustered` is set.
    pub leftovers: Vec<usize>,
}

/// Greedy clustering engine.
///
/// Owns the catalog mutably for the duration of the run; every status,
/// distance, and frequency update lands in the catalog.
pub struct GreedyClusterer<'a> {
    pub catalog: &'a mut Catalog,
    pub options: ClusterOptions,
}

impl<'a> GreedyClusterer<'a> {
    pub fn new(catalog: &'a mut Catalog, options: ClusterOptions) -> Self {
        Self { catalog, options }
    }

    /// Run greedy clustering over the catalog.
    ///
    /// Algorithm:
    /// 1) Rank records by descending abundance (stable).
    /// 2) Walk the ranking once. For each eligible center `c`:
    ///    - Promote `c` (it never becomes a center or member again).
    ///    - Collect every eligible candidate `j` in ranked order
    ///      (abundance window, length, recycle policy).
    ///    - Compute `edit_distance(c, j)` for those only; accept `j` when
    ///      the distance is within `dist_cutoff`.
    ///    - Commit the peak if it holds at least `min_seqs` sequences.
    pub fn run(&mut self) -> Result<ClusterResult> {
        self.options.validate()?;

        let mut result = ClusterResult::default();
        if self.catalog.is_empty() {
            return Ok(result);
        }

        info!(
            "Clustering {} sequences (total abundance {})",
            self.catalog.len(),
            self.catalog.total_abundance()
        );

        let order = self.catalog.ranked();

        for &c in &order {
            if !self.is_center_eligible(c) {
                continue;
            }

            let center_abd = self.catalog.get(c).abundance();
            self.catalog.promote_center(c);

            let mut members = Vec::with_capacity(16);
            members.push(PeakMember {
                id: c,
                local_rank: 1,
                distance: 0,
                status: Status::Unassigned,
            });

            // Eligibility does not depend on decisions made for other
            // candidates of the same center, so filtering up front is safe.
            let cands: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&j| self.is_candidate_eligible(j, center_abd))
                .collect();

            for (j, dist) in self.within_cutoff(c, &cands) {
                let prior = self.catalog.get(j).status();
                self.catalog.accept_candidate(j, dist);
                trace!(
                    "  {} joins center {} at distance {}",
                    self.catalog.get(j).sequence(),
                    self.catalog.get(c).sequence(),
                    dist
                );
                members.push(PeakMember {
                    id: j,
                    local_rank: members.len() + 1,
                    distance: dist,
                    status: prior,
                });
            }

            if members.len() >= self.options.min_seqs {
                let rank = result.peaks.len() + 1;
                debug!(
                    "Peak {} committed: center {} (abundance {}), {} sequences",
                    rank,
                    self.catalog.get(c).sequence(),
                    center_abd,
                    members.len()
                );
                result.peaks.push(Peak { rank, members });
            } else {
                debug!(
                    "Center {} rejected: {} sequence(s) < min_seqs {}",
                    self.catalog.get(c).sequence(),
                    members.len(),
                    self.options.min_seqs
                );
                if self.options.keep_unclustered {
                    result.rejected.push(RejectedPeak { members });
                }
            }
        }

        if self.options.keep_unclustered {
            for &i in &order {
                if self.catalog.get(i).status() == Status::Unassigned {
                    self.catalog.note_frequency(i);
                    result.leftovers.push(i);
                }
            }
        }

        info!(
            "Clustering resulted in {} peaks ({} rejected centers recorded, {} leftovers)",
            result.peaks.len(),
            result.rejected.len(),
            result.leftovers.len()
        );

        Ok(result)
    }

    #[inline]
    fn is_center_eligible(&self, i: usize) -> bool {
        let rec = self.catalog.get(i);
        rec.status() == Status::Unassigned
            && rec.abundance() >= self.options.min_abd_center
            && rec.len() >= self.options.dist_cutoff as usize
    }

    /// Cheap checks only; the distance is computed later for survivors.
    ///
    /// The abundance ceiling is checked explicitly: with recycling, a record
    /// consumed by an earlier peak may sit anywhere in the ranking.
    #[inline]
    fn is_candidate_eligible(&self, j: usize, center_abd: u64) -> bool {
        let rec = self.catalog.get(j);
        let abd = rec.abundance();
        if abd < self.options.min_abd || abd > center_abd {
            return false;
        }
        if rec.len() < self.options.dist_cutoff as usize {
            return false;
        }
        match rec.status() {
            Status::Unassigned => true,
            Status::Consumed => self.options.allow_recycle,
            Status::Center => false,
        }
    }

    /// Distances for the candidates within `dist_cutoff` of `center`,
    /// returned in the order of `cands`.
    fn within_cutoff(&self, center: usize, cands: &[usize]) -> Vec<(usize, u32)> {
        let catalog: &Catalog = &*self.catalog;
        let center_seq = catalog.get(center).sequence();
        let cutoff = self.options.dist_cutoff;

        if self.options.parallel_dist_checks {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                // `collect` on a rayon iterator keeps input order.
                return cands
                    .par_iter()
                    .filter_map(|&j| {
                        let d = edit_distance(center_seq, catalog.get(j).sequence());
                        (d <= cutoff).then_some((j, d))
                    })
                    .collect();
            }

            #[cfg(not(feature = "parallel"))]
            {
                // Fallback to sequential when feature is disabled.
                debug!("parallel distance checks requested without the `parallel` feature");
            }
        }

        cands
            .iter()
            .filter_map(|&j| {
                let d = edit_distance(center_seq, catalog.get(j).sequence());
                (d <= cutoff).then_some((j, d))
            })
            .collect()
    }
}

/// Levenshtein distance between two sequences, counted per byte.
///
/// Catalog sequences are ASCII, so bytes and symbols coincide.
pub fn edit_distance(a: &str, b: &str) -> u32 {
    bio::alignment::distance::levenshtein(a.as_bytes(), b.as_bytes())
}
