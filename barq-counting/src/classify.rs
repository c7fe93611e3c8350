use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use needletail::{FastxReader, parse_fastx_file};

use barq_index::BarcodeIndex;

use crate::match_engine::MatchEngine;

/// The outcome for a single read: its identifier and the target of the
/// winning index entry, if any. A read with no matching barcode has no
/// target; that is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub read_id: String,
    pub target: Option<String>,
}

/// What to do with a read record the parser rejects. Silent dropping is not
/// an option; skipped records are tallied and surfaced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedReadPolicy {
    /// Fail the file on the first malformed record.
    #[default]
    Abort,
    /// Stop reading the file at the first malformed record, keeping the
    /// reads classified so far and a visible tally of the failure.
    Skip,
}

///
/// Lazily classifies the reads of one sample file, in file order.
///
/// The iterator is one-shot; re-create it from the same path to re-derive
/// the same assignments. The index and engine are borrowed read-only, so
/// one pair serves any number of files.
///
pub struct ReadClassifier<'a> {
    reader: Box<dyn FastxReader>,
    index: &'a BarcodeIndex,
    engine: &'a dyn MatchEngine,
    path: PathBuf,
    record_num: usize,
    failed: bool,
}

impl<'a> ReadClassifier<'a> {
    pub fn from_file(
        path: &Path,
        index: &'a BarcodeIndex,
        engine: &'a dyn MatchEngine,
    ) -> Result<Self> {
        let reader = parse_fastx_file(path)
            .with_context(|| format!("Failed to open read file: {:?}", path))?;

        Ok(Self {
            reader,
            index,
            engine,
            path: path.to_path_buf(),
            record_num: 0,
            failed: false,
        })
    }
}

impl Iterator for ReadClassifier<'_> {
    type Item = Result<Assignment>;

    fn next(&mut self) -> Option<Self::Item> {
        // the parser cannot resync past a bad record, so the first error
        // ends the stream
        if self.failed {
            return None;
        }

        let record = self.reader.next()?;
        self.record_num += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                self.failed = true;
                return Some(Err(anyhow::Error::new(e).context(format!(
                    "Failed to parse read record {} in: {:?}",
                    self.record_num, self.path
                ))));
            }
        };

        let read_id = String::from_utf8_lossy(record.id()).to_string();
        let target = self
            .engine
            .find(&record.seq())
            .and_then(|slot| self.index.target_at(slot))
            .map(|t| t.to_string());

        Some(Ok(Assignment { read_id, target }))
    }
}
