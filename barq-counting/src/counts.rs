use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use fxhash::FxHashMap;

use barq_core::errors::BarqError;
use barq_core::utils::{get_dynamic_reader, get_dynamic_writer};

use crate::classify::Assignment;

///
/// Per-file tally of assigned targets.
///
/// Targets never matched in the file are absent, not zero; the explicit
/// zero-fill happens once, at matrix assembly. First-observation order of
/// the targets is retained so that downstream column order is reproducible
/// from traversal alone.
///
#[derive(Debug, Clone, Default)]
pub struct SampleCounts {
    order: Vec<String>,
    counts: FxHashMap<String, u32>,
}

impl SampleCounts {
    /// Count occurrences of each assigned target. Accumulation is
    /// commutative: permuting the assignments never changes the counts.
    pub fn tally(assignments: impl IntoIterator<Item = Assignment>) -> Self {
        let mut counts = Self::default();

        for assignment in assignments {
            if let Some(target) = assignment.target {
                counts.add(&target);
            }
        }

        counts
    }

    pub fn add(&mut self, target: &str) {
        match self.counts.get_mut(target) {
            Some(count) => *count += 1,
            None => {
                self.order.push(target.to_string());
                self.counts.insert(target.to_string(), 1);
            }
        }
    }

    pub fn get(&self, target: &str) -> Option<u32> {
        self.counts.get(target).copied()
    }

    /// Tallied (target, count) pairs in first-observation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order.iter().map(|t| (t.as_str(), self.counts[t]))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

///
/// Dense samples x targets matrix with owned row and column labels.
///
/// Row order is processing order and column order is first-observation
/// order across samples; neither is ever sorted. Cells for a target a
/// sample never observed are explicit zeros introduced at assembly.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    data: Vec<u32>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl CountMatrix {
    /// Union the targets of every sample into the column universe, then fill
    /// each row, writing explicit zeros for targets a sample never observed.
    /// Zero samples is a configuration error, not an empty file.
    pub fn assemble(samples: &[(String, SampleCounts)]) -> Result<Self, BarqError> {
        if samples.is_empty() {
            return Err(BarqError::EmptyMatrix);
        }

        let mut col_labels: Vec<String> = Vec::new();
        let mut col_slots: FxHashMap<String, usize> = FxHashMap::default();
        for (_, counts) in samples {
            for (target, _) in counts.iter() {
                if !col_slots.contains_key(target) {
                    col_slots.insert(target.to_string(), col_labels.len());
                    col_labels.push(target.to_string());
                }
            }
        }

        let cols = col_labels.len();
        let mut matrix = Self {
            data: vec![0; samples.len() * cols],
            row_labels: samples.iter().map(|(label, _)| label.clone()).collect(),
            col_labels,
        };

        for (row, (_, counts)) in samples.iter().enumerate() {
            for (target, count) in counts.iter() {
                matrix.data[row * cols + col_slots[target]] = count;
            }
        }

        Ok(matrix)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&u32> {
        if row < self.rows() && col < self.cols() {
            self.data.get(row * self.cols() + col)
        } else {
            None
        }
    }

    /// Cell value looked up by labels.
    pub fn value(&self, sample: &str, target: &str) -> Option<u32> {
        let row = self.row_labels.iter().position(|l| l == sample)?;
        let col = self.col_labels.iter().position(|l| l == target)?;
        self.get(row, col).copied()
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Persist the matrix as delimited text (gzip'd when the path ends in
    /// `.gz`): header row of target names, one row per sample, labels in
    /// the first column.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let writer = get_dynamic_writer(path)?;
        let mut table = WriterBuilder::new().from_writer(writer);

        let mut header = vec!["sample".to_string()];
        header.extend(self.col_labels.iter().cloned());
        table
            .write_record(&header)
            .with_context(|| format!("Failed to write count matrix to: {:?}", path))?;

        for (row, label) in self.row_labels.iter().enumerate() {
            let mut record = vec![label.clone()];
            record.extend(
                self.data[row * self.cols()..(row + 1) * self.cols()]
                    .iter()
                    .map(|v| v.to_string()),
            );
            table
                .write_record(&record)
                .with_context(|| format!("Failed to write count matrix to: {:?}", path))?;
        }

        table.flush()?;

        Ok(())
    }

    /// Reload a persisted matrix, preserving labels and values exactly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let mut table = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = table
            .headers()
            .with_context(|| format!("Failed to read count matrix header from: {:?}", path))?
            .clone();
        let col_labels: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

        let mut row_labels = Vec::new();
        let mut data = Vec::new();
        for (row_num, row) in table.records().enumerate() {
            let row = row
                .with_context(|| format!("Failed to parse count matrix row {}", row_num + 1))?;

            let mut fields = row.iter();
            let Some(label) = fields.next() else {
                anyhow::bail!("Count matrix row {} has no sample label", row_num + 1)
            };
            row_labels.push(label.to_string());

            let mut row_width = 0;
            for field in fields {
                let count: u32 = field.parse().with_context(|| {
                    format!("Invalid count value at row {}: {:?}", row_num + 1, field)
                })?;
                data.push(count);
                row_width += 1;
            }

            if row_width != col_labels.len() {
                anyhow::bail!(
                    "Count matrix row {} has {} values for {} columns",
                    row_num + 1,
                    row_width,
                    col_labels.len()
                )
            }
        }

        Ok(Self {
            data,
            row_labels,
            col_labels,
        })
    }
}
