//! In-memory sequence catalog and abundance ranking.
//!
//! Records live in an arena addressed by stable index. The clustering pass
//! never removes entries; taking a record out of play is a [`Status`]
//! transition, so ranked positions stay valid for the whole run.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::error::{ClusterError, Result};

/// Where a record stands in the clustering pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Never used as a center nor accepted as a candidate.
    Unassigned,
    /// Accepted as a candidate of at least one pending peak.
    Consumed,
    /// Promoted to center. Permanently out of play.
    Center,
}

impl Status {
    /// Status digit used in the text reports (`st=1` / `st=2`).
    ///
    /// A center is reported with the status it had when it was promoted,
    /// which is always `Unassigned`, so `Center` never reaches a report row.
    pub fn code(self) -> u8 {
        match self {
            Status::Unassigned => 1,
            Status::Consumed => 2,
            Status::Center => 0,
        }
    }
}

/// One distinct observed sequence.
#[derive(Clone, Debug)]
pub struct SequenceRecord {
    sequence: String,
    abundance: u64,
    length: usize,
    pub(crate) frequency: Option<f64>,
    pub(crate) distance: Option<u32>,
    pub(crate) status: Status,
}

impl SequenceRecord {
    fn new(sequence: String, abundance: u64) -> Self {
        let length = sequence.len();
        Self {
            sequence,
            abundance,
            length,
            frequency: None,
            distance: None,
            status: Status::Unassigned,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn abundance(&self) -> u64 {
        self.abundance
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Frequency recorded when the record was last used or reported.
    pub fn frequency(&self) -> Option<f64> {
        self.frequency
    }

    /// Distance to the center of the last peak that accepted this record.
    /// `Some(0)` for a center.
    pub fn distance_to_center(&self) -> Option<u32> {
        self.distance
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

/// All sequence records of one run plus the fixed abundance total.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<SequenceRecord>,
    total_abundance: u64,
}

impl Catalog {
    /// Build a catalog from `(sequence, abundance)` pairs. The total is the
    /// sum of all abundances.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let records = collect_records(pairs)?;
        let total_abundance = records.iter().map(|r| r.abundance).sum();
        Ok(Self {
            records,
            total_abundance,
        })
    }

    /// Build a catalog whose total abundance is supplied independently of
    /// the records (e.g. the molecule count declared by an input header).
    pub fn with_total<I, S>(pairs: I, total_abundance: u64) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Ok(Self {
            records: collect_records(pairs)?,
            total_abundance,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_abundance(&self) -> u64 {
        self.total_abundance
    }

    pub fn get(&self, id: usize) -> &SequenceRecord {
        &self.records[id]
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    /// `abundance / total_abundance`, or 0 when the total is 0.
    pub fn frequency_of(&self, id: usize) -> f64 {
        if self.total_abundance == 0 {
            return 0.0;
        }
        self.records[id].abundance as f64 / self.total_abundance as f64
    }

    /// Record indices in descending abundance order.
    ///
    /// The sort is stable: equal abundances keep their input order, so the
    /// same input always yields the same ranking.
    pub fn ranked(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.records.len()).collect();
        idx.sort_by_key(|&i| Reverse(self.records[i].abundance));
        idx
    }

    pub(crate) fn promote_center(&mut self, id: usize) {
        let freq = self.frequency_of(id);
        let rec = &mut self.records[id];
        rec.status = Status::Center;
        rec.distance = Some(0);
        rec.frequency = Some(freq);
    }

    pub(crate) fn accept_candidate(&mut self, id: usize, distance: u32) {
        let freq = self.frequency_of(id);
        let rec = &mut self.records[id];
        rec.status = Status::Consumed;
        rec.distance = Some(distance);
        rec.frequency = Some(freq);
    }

    pub(crate) fn note_frequency(&mut self, id: usize) {
        let freq = self.frequency_of(id);
        self.records[id].frequency = Some(freq);
    }
}

fn collect_records<I, S>(pairs: I) -> Result<Vec<SequenceRecord>>
where
    I: IntoIterator<Item = (S, u64)>,
    S: Into<String>,
{
    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (i, (seq, abundance)) in pairs.into_iter().enumerate() {
        let seq: String = seq.into();
        if seq.is_empty() {
            return Err(ClusterError::EmptySequence { position: i + 1 });
        }
        if !seq.is_ascii() {
            return Err(ClusterError::NonAsciiSequence {
                position: i + 1,
                sequence: seq,
            });
        }
        if !seen.insert(seq.clone()) {
            return Err(ClusterError::DuplicateSequence { sequence: seq });
        }
        records.push(SequenceRecord::new(seq, abundance));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_abundances() {
        let cat = Catalog::from_pairs([("AAAA", 100), ("AAAT", 50), ("CCCC", 40)]).unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.total_abundance(), 190);
        assert_eq!(cat.get(1).len(), 4);
        assert_eq!(cat.get(1).status(), Status::Unassigned);
        assert!(cat.get(1).frequency().is_none());
    }

    #[test]
    fn test_supplied_total_is_kept() {
        let cat = Catalog::with_total([("AC", 3), ("GT", 1)], 10).unwrap();
        assert_eq!(cat.total_abundance(), 10);
        assert!((cat.frequency_of(0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_gives_zero_frequency() {
        let cat = Catalog::from_pairs([("AC", 0)]).unwrap();
        assert_eq!(cat.frequency_of(0), 0.0);
    }

    #[test]
    fn test_ranked_descending_and_stable() {
        let cat =
            Catalog::from_pairs([("A", 5), ("C", 9), ("G", 5), ("T", 1), ("AA", 9)]).unwrap();
        // ties keep input order: C before AA, A before G
        assert_eq!(cat.ranked(), vec![1, 4, 0, 2, 3]);
        // ranking has no side effects
        assert_eq!(cat.ranked(), vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let err = Catalog::from_pairs([("ACGT", 3), ("", 2)]).unwrap_err();
        assert!(matches!(err, ClusterError::EmptySequence { position: 2 }));
    }

    #[test]
    fn test_non_ascii_sequence_rejected() {
        let err = Catalog::from_pairs([("Ae", 50), ("A\u{e9}", 100)]).unwrap_err();
        assert!(matches!(err, ClusterError::NonAsciiSequence { position: 2, .. }));
        // lengths count symbols, which is bytes for accepted input
        let cat = Catalog::from_pairs([("ACGN-", 1)]).unwrap();
        assert_eq!(cat.get(0).len(), 5);
    }

    #[test]
    fn test_duplicate_sequence_rejected() {
        let err = Catalog::from_pairs([("ACGT", 3), ("ACGT", 2)]).unwrap_err();
        assert!(matches!(err, ClusterError::DuplicateSequence { .. }));
    }

    #[test]
    fn test_empty_catalog() {
        let cat = Catalog::from_pairs(Vec::<(String, u64)>::new()).unwrap();
        assert!(cat.is_empty());
        assert_eq!(cat.total_abundance(), 0);
        assert!(cat.ranked().is_empty());
    }

    #[test]
    fn test_status_transitions() {
        let mut cat = Catalog::from_pairs([("AAAA", 3), ("AAAT", 1)]).unwrap();
        cat.promote_center(0);
        cat.accept_candidate(1, 1);
        assert_eq!(cat.get(0).status(), Status::Center);
        assert_eq!(cat.get(0).distance_to_center(), Some(0));
        assert_eq!(cat.get(1).status(), Status::Consumed);
        assert_eq!(cat.get(1).distance_to_center(), Some(1));
        assert!((cat.get(1).frequency().unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Unassigned.code(), 1);
        assert_eq!(Status::Consumed.code(), 2);
    }
}
