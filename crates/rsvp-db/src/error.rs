use std::path::PathBuf;

/// Failures the stores report instead of swallowing.
///
/// A missing table file is never an error (it reads as an empty table), and
/// malformed rows are skipped during decode, so what remains is I/O.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{table}: i/o error on {}: {source}", .path.display())]
    Io {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table}: failed to encode rows: {source}")]
    Encode {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Io { table, .. } | Self::Encode { table, .. } => table,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
