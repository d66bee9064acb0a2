use std::io::Read;

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use tracing::debug;

use crate::errors::ParserError;
use crate::model::{RawRow, RawTable, SourceKind};

pub const FIELD_DELIMITER: u8 = b'|';

/// Reads a headerless, pipe-delimited table.
///
/// Row lengths may vary; short and malformed rows are kept here and left for
/// the normalizer to drop. Only a read failure or an input with no lines at
/// all is an error.
pub fn read_table<R: Read>(kind: SourceKind, input: R) -> Result<RawTable, ParserError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    let mut undecodable_rows = 0usize;
    let mut record = ByteRecord::new();

    while reader
        .read_byte_record(&mut record)
        .map_err(|source| ParserError::Csv { kind, source })?
    {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        match StringRecord::from_byte_record(record.clone()) {
            Ok(fields) => rows.push(RawRow::new(
                line,
                fields.iter().map(str::to_string).collect(),
            )),
            Err(_) => undecodable_rows += 1,
        }
    }

    if rows.is_empty() && undecodable_rows == 0 {
        return Err(ParserError::EmptyData { kind });
    }

    debug!(
        table = %kind,
        rows = rows.len(),
        undecodable_rows,
        "read raw table"
    );

    Ok(RawTable {
        kind,
        rows,
        undecodable_rows,
    })
}
