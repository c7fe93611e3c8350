use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarqError {
    #[error("Invalid nucleotide character: {0:?}")]
    InvalidBase(char),

    #[error("Column not found in barcode table header: {0}")]
    MissingColumn(String),

    #[error("0 barcode records in the reference: {0}")]
    EmptyReference(String),

    #[error("Stored reverse complement disagrees with the barcode for target: {0}")]
    StoredRevcompMismatch(String),

    #[error("Label pattern {pattern} did not match file name: {file}")]
    LabelPatternMismatch { pattern: String, file: String },

    #[error("No samples were processed. Refusing to write an empty count matrix")]
    EmptyMatrix,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
