use std::collections::HashMap;

use crate::models::commit::CommitRecord;

/// Directed co-change counts with a running maximum.
///
/// Every increment is applied to both `(a, b)` and `(b, a)`, so the two
/// directions of a pair always agree.
#[derive(Debug, Clone, Default)]
pub struct PairWeights {
    counts: HashMap<(String, String), u32>,
    max: u32,
}

impl PairWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every ordered pair of distinct paths in one commit.
    ///
    /// A path listed twice contributes its pairs twice.
    pub fn add_commit(&mut self, files: &[String]) {
        for f1 in files {
            for f2 in files {
                if f1 == f2 {
                    continue;
                }

                let count = self.counts.entry((f1.clone(), f2.clone())).or_insert(0);
                *count += 1;
                if *count > self.max {
                    self.max = *count;
                }
            }
        }
    }

    pub fn add_record(&mut self, record: &CommitRecord) {
        self.add_commit(&record.files);
    }

    /// Number of commits in which `a` and `b` both changed (0 if never).
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        self.counts
            .get(&(a.to_string(), b.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Largest count of any pair; 0 only while the table is empty.
    pub fn max_weight(&self) -> u32 {
        self.max
    }

    /// Number of directed entries (twice the number of unordered pairs).
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Directed entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.counts
            .iter()
            .map(|((a, b), &c)| (a.as_str(), b.as_str(), c))
    }
}

impl FromIterator<CommitRecord> for PairWeights {
    fn from_iter<I: IntoIterator<Item = CommitRecord>>(iter: I) -> Self {
        let mut weights = Self::new();
        for record in iter {
            weights.add_record(&record);
        }
        weights
    }
}
