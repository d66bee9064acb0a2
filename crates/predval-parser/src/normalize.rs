use std::fmt;

use tracing::debug;

use crate::model::{Observation, RawRow, RawTable, RecordSet, RecordSetBuilder, SourceKind};

/// Why a raw row did not make it into the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDefect {
    TooFewFields,
    UnparseableTime,
    UnparseableValue,
    MissingEntity,
    NonIntegralTime,
}

impl RowDefect {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowDefect::TooFewFields => "too_few_fields",
            RowDefect::UnparseableTime => "unparseable_time",
            RowDefect::UnparseableValue => "unparseable_value",
            RowDefect::MissingEntity => "missing_entity",
            RowDefect::NonIntegralTime => "non_integral_time",
        }
    }
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub too_few_fields: usize,
    pub unparseable_time: usize,
    pub unparseable_value: usize,
    pub missing_entity: usize,
    pub non_integral_time: usize,
    pub duplicates: usize,
}

impl NormalizeStats {
    fn record(&mut self, defect: RowDefect) {
        let counter = match defect {
            RowDefect::TooFewFields => &mut self.too_few_fields,
            RowDefect::UnparseableTime => &mut self.unparseable_time,
            RowDefect::UnparseableValue => &mut self.unparseable_value,
            RowDefect::MissingEntity => &mut self.missing_entity,
            RowDefect::NonIntegralTime => &mut self.non_integral_time,
        };
        *counter += 1;
    }

    pub fn dropped(&self) -> usize {
        self.too_few_fields
            + self.unparseable_time
            + self.unparseable_value
            + self.missing_entity
            + self.non_integral_time
            + self.duplicates
    }

    pub fn kept(&self) -> usize {
        self.rows_read - self.dropped()
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub kind: SourceKind,
    pub records: RecordSet,
    pub stats: NormalizeStats,
}

/// Cleans a raw table into a record set. Defective rows are dropped and
/// counted, never reported as errors.
pub fn normalize_table(table: &RawTable) -> NormalizedTable {
    let (records, stats) = normalize_rows(&table.rows);

    debug!(
        table = %table.kind,
        rows_read = stats.rows_read,
        kept = stats.kept(),
        too_few_fields = stats.too_few_fields,
        unparseable_time = stats.unparseable_time,
        unparseable_value = stats.unparseable_value,
        missing_entity = stats.missing_entity,
        non_integral_time = stats.non_integral_time,
        duplicates = stats.duplicates,
        "normalized table"
    );

    NormalizedTable {
        kind: table.kind,
        records,
        stats,
    }
}

/// Row-level cleaning. The first row seen for a `(time, entity)` key wins.
pub fn normalize_rows<'a, I>(rows: I) -> (RecordSet, NormalizeStats)
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut builder = RecordSetBuilder::default();
    let mut stats = NormalizeStats::default();

    for row in rows {
        stats.rows_read += 1;
        match normalize_row(row) {
            Ok(observation) => {
                if !builder.push(observation) {
                    stats.duplicates += 1;
                }
            }
            Err(defect) => stats.record(defect),
        }
    }

    (builder.build(), stats)
}

pub fn normalize_row(row: &RawRow) -> Result<Observation, RowDefect> {
    let (Some(time), Some(entity), Some(value)) = (row.field(0), row.field(1), row.field(2))
    else {
        return Err(RowDefect::TooFewFields);
    };

    let time = parse_number(time).ok_or(RowDefect::UnparseableTime)?;
    let value = parse_number(value).ok_or(RowDefect::UnparseableValue)?;

    let entity = entity.trim();
    if entity.is_empty() {
        return Err(RowDefect::MissingEntity);
    }

    let time = integral_time(time).ok_or(RowDefect::NonIntegralTime)?;

    Ok(Observation::new(time, entity.to_uppercase(), value))
}

// nan/inf parse as f64 but count as missing.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn integral_time(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}
