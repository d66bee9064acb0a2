use thiserror::Error;

use crate::model::SourceKind;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{kind} table could not be read: {source}")]
    Csv {
        kind: SourceKind,
        #[source]
        source: csv::Error,
    },

    #[error("{kind} table did not contain any data rows")]
    EmptyData { kind: SourceKind },
}

impl ParserError {
    pub fn kind(&self) -> SourceKind {
        match self {
            ParserError::Csv { kind, .. } | ParserError::EmptyData { kind } => *kind,
        }
    }
}
