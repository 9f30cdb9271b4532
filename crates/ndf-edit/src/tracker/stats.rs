//! Aggregate statistics over modification records.

use std::collections::{BTreeMap, BTreeSet};

use crate::path::{normalize_path, wildcard_indices};
use crate::tracker::{ModificationKind, ModificationRecord};

/// Summary of a tracker's records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModificationStats {
    /// Number of records.
    pub total: usize,
    /// Number of distinct objects touched.
    pub objects: usize,
    /// Number of distinct (object, property) pairs touched, with array
    /// indices collapsed so `M[0].X` and `M[1].X` count once.
    pub unique_properties: usize,
    /// Record count per kind.
    pub by_kind: BTreeMap<ModificationKind, usize>,
}

impl ModificationStats {
    pub(crate) fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ModificationRecord>,
    {
        let mut stats = ModificationStats::default();
        let mut objects = BTreeSet::new();
        let mut properties = BTreeSet::new();

        for record in records {
            stats.total += 1;
            *stats.by_kind.entry(record.kind).or_insert(0) += 1;
            objects.insert(record.object.as_str());
            if !record.path.is_empty() {
                properties.insert((
                    record.object.as_str(),
                    wildcard_indices(&normalize_path(&record.path)),
                ));
            }
        }

        stats.objects = objects.len();
        stats.unique_properties = properties.len();
        stats
    }

    /// Number of records of the given kind.
    pub fn count(&self, kind: ModificationKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}
