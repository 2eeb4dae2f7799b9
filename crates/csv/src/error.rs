pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    File(#[from] s3os_file::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{location} is not valid UTF-8: {source}")]
    Decode {
        location: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column {name} appears more than once")]
    DuplicateColumn { name: String },

    /// Nothing matched, so there was nothing to concatenate
    #[error("no CSV files to aggregate under {location}")]
    EmptyAggregation { location: String },
}
