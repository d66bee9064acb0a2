use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Actual,
    Predicted,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Actual => "actual",
            SourceKind::Predicted => "predicted",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One delimited input line, split into fields but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// All rows read from one input source, in file order.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub kind: SourceKind,
    pub rows: Vec<RawRow>,
    /// Lines skipped at read time because they were not valid UTF-8.
    pub undecodable_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: i64,
    /// Trimmed and upper-cased.
    pub entity: String,
    pub value: f64,
}

impl Observation {
    pub fn new(time: i64, entity: impl Into<String>, value: f64) -> Self {
        Self {
            time,
            entity: entity.into(),
            value,
        }
    }

    pub fn key(&self) -> (i64, &str) {
        (self.time, self.entity.as_str())
    }
}

/// Cleaned observations of one source with `(time, entity)` unique.
///
/// Iteration follows first-occurrence input order. A per-time index backs
/// the window lookups done by the aggregator.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    observations: Vec<Observation>,
    by_time: BTreeMap<i64, Vec<usize>>,
}

impl RecordSet {
    /// Builds a set from observations, keeping the first row per key.
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut builder = RecordSetBuilder::default();
        for observation in observations {
            builder.push(observation);
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Smallest and largest observed time, or `None` for an empty set.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let min = *self.by_time.keys().next()?;
        let max = *self.by_time.keys().next_back()?;
        Some((min, max))
    }

    /// Observations with `start <= time <= end`, ascending by time.
    pub fn in_time_range(&self, start: i64, end: i64) -> impl Iterator<Item = &Observation> {
        let observations = &self.observations;
        let buckets = if start <= end {
            Some(self.by_time.range(start..=end))
        } else {
            None
        };
        buckets
            .into_iter()
            .flatten()
            .flat_map(move |(_, idxs)| idxs.iter().map(move |&idx| &observations[idx]))
    }

    pub fn value_of(&self, time: i64, entity: &str) -> Option<f64> {
        self.by_time
            .get(&time)?
            .iter()
            .map(|&idx| &self.observations[idx])
            .find(|obs| obs.entity == entity)
            .map(|obs| obs.value)
    }

    /// Renders the set back into raw rows, in iteration order.
    pub fn to_raw_rows(&self) -> Vec<RawRow> {
        self.observations
            .iter()
            .enumerate()
            .map(|(idx, obs)| {
                RawRow::new(
                    idx as u64 + 1,
                    vec![obs.time.to_string(), obs.entity.clone(), obs.value.to_string()],
                )
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordSetBuilder {
    seen: HashSet<(i64, String)>,
    set: RecordSet,
}

impl RecordSetBuilder {
    /// Adds the observation unless its key is already present. Returns
    /// whether it was kept.
    pub fn push(&mut self, observation: Observation) -> bool {
        if !self.seen.insert((observation.time, observation.entity.clone())) {
            return false;
        }
        let idx = self.set.observations.len();
        self.set
            .by_time
            .entry(observation.time)
            .or_default()
            .push(idx);
        self.set.observations.push(observation);
        true
    }

    pub fn build(self) -> RecordSet {
        self.set
    }
}
