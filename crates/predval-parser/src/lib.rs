pub mod errors;
pub mod model;
mod normalize;
mod reader;

pub use errors::ParserError;
pub use model::{Observation, RawRow, RawTable, RecordSet, RecordSetBuilder, SourceKind};
pub use normalize::{
    normalize_row, normalize_rows, normalize_table, NormalizeStats, NormalizedTable, RowDefect,
};
pub use reader::{read_table, FIELD_DELIMITER};
