//! Greedy edit-distance clustering for selection-experiment count data.
//!
//! - Input: distinct sequences with their abundances (molecule counts).
//! - Centers: the most abundant eligible sequences, taken in ranked order.
//! - Membership: Levenshtein distance to the center within a cutoff.
//! - Peaks below a minimum size are discarded; the sequences they touched
//!   stay consumed.
//!
//! This crate aims to keep the API small and deterministic: the same input
//! always yields the same peaks in the same order.

pub mod catalog;
pub mod counts;
pub mod error;
pub mod greedy;
pub mod logging;
pub mod report;

pub use catalog::{Catalog, SequenceRecord, Status};
pub use counts::{load_counts, read_counts, CountTable};
pub use error::{ClusterError, Result};
pub use greedy::{
    edit_distance, ClusterOptions, ClusterResult, GreedyClusterer, Peak, PeakMember, RejectedPeak,
};
pub use report::{write_nopeaks, write_peaks, write_reports, ReportPaths};
