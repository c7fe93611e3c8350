use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};

use barq_core::errors::BarqError;
use barq_core::models::BarcodeRecord;
use barq_core::utils::{get_dynamic_reader, get_dynamic_writer};

///
/// Where to find things in a raw barcode design table.
///
/// Design sheets come with varying delimiters, sometimes a title line above
/// the real header, and arbitrary column names for the target and barcode
/// columns. Columns are always located by name, never by position.
///
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub delimiter: u8,
    /// Number of rows to discard before the header row.
    pub skip_rows: usize,
    pub target_col: String,
    pub barcode_col: String,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            skip_rows: 0,
            target_col: "target".to_string(),
            barcode_col: "barcode".to_string(),
        }
    }
}

///
/// The barcode design library: every record of the reference table with its
/// derived reverse complement. Built once per run and immutable afterwards.
///
#[derive(Debug, Clone)]
pub struct BarcodeLibrary {
    records: Vec<BarcodeRecord>,
}

impl BarcodeLibrary {
    /// Load a raw design table and augment each row with its reverse
    /// complement. Fails fast on an unknown column, a short row, an invalid
    /// base, or an empty table.
    pub fn from_file(path: &Path, spec: &TableSpec) -> Result<Self> {
        let mut reader = get_dynamic_reader(path)?;

        let mut discarded = String::new();
        for _ in 0..spec.skip_rows {
            discarded.clear();
            reader
                .read_line(&mut discarded)
                .with_context(|| format!("Failed to skip header offset in: {:?}", path))?;
        }

        let mut table = ReaderBuilder::new()
            .delimiter(spec.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = table
            .headers()
            .with_context(|| format!("Failed to read barcode table header from: {:?}", path))?
            .clone();

        let target_idx = headers
            .iter()
            .position(|h| h == spec.target_col)
            .ok_or_else(|| BarqError::MissingColumn(spec.target_col.clone()))?;
        let barcode_idx = headers
            .iter()
            .position(|h| h == spec.barcode_col)
            .ok_or_else(|| BarqError::MissingColumn(spec.barcode_col.clone()))?;

        let mut records = Vec::new();
        for (row_num, row) in table.records().enumerate() {
            let row = row
                .with_context(|| format!("Failed to parse barcode table row {}", row_num + 1))?;

            let target = row.get(target_idx);
            let barcode = row.get(barcode_idx);

            if let (Some(target), Some(barcode)) = (target, barcode) {
                let record = BarcodeRecord::new(target.to_string(), barcode.to_string())
                    .with_context(|| {
                        format!("Invalid barcode at row {} for target: {}", row_num + 1, target)
                    })?;
                records.push(record);
            } else {
                anyhow::bail!(
                    "Barcode table row {} is missing a target or barcode value: {:?}",
                    row_num + 1,
                    row
                )
            }
        }

        if records.is_empty() {
            Err(BarqError::EmptyReference(format!("{:?}", path)))?;
        }

        Ok(Self { records })
    }

    /// Reload a previously persisted augmented table. The stored reverse
    /// complement of every row is validated against its barcode.
    pub fn from_augmented_file(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;

        let mut table = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (row_num, row) in table.deserialize().enumerate() {
            let row: BarcodeRecord = row.with_context(|| {
                format!("Failed to parse augmented table row {} in: {:?}", row_num + 1, path)
            })?;
            let record = BarcodeRecord::from_augmented(row.target, row.barcode, row.revcomp)?;
            records.push(record);
        }

        if records.is_empty() {
            Err(BarqError::EmptyReference(format!("{:?}", path)))?;
        }

        Ok(Self { records })
    }

    /// Build a library directly from records, keeping their order.
    pub fn from_records(records: Vec<BarcodeRecord>) -> Self {
        Self { records }
    }

    /// Persist the augmented table (tab-separated, gzip'd when the path ends
    /// in `.gz`) for reuse by later runs.
    pub fn write_augmented(&self, path: &Path) -> Result<()> {
        let writer = get_dynamic_writer(path)?;
        let mut table = WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        for record in &self.records {
            table
                .serialize(record)
                .with_context(|| format!("Failed to write augmented table to: {:?}", path))?;
        }

        table.flush()?;

        Ok(())
    }

    pub fn records(&self) -> &[BarcodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
