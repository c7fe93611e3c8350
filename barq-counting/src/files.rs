use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use barq_core::errors::BarqError;
use barq_core::utils::remove_all_extensions;

///
/// Read files gathered from one or more directories, selected by a file-name
/// extension filter.
///
/// Files are yielded in directory argument order, then `read_dir` traversal
/// order within each directory. Matrix rows follow this order, so entries
/// are never sorted.
///
pub struct ReadFileDiscovery {
    curr: usize,
    files: Vec<PathBuf>,
}

impl ReadFileDiscovery {
    pub fn new<P: AsRef<Path>>(dirs: &[P], extension: &str) -> Result<Self> {
        let mut files = Vec::new();

        for dir in dirs {
            let dir = dir.as_ref();
            let entries = fs::read_dir(dir).with_context(|| {
                format!("There was an error reading the read file directory: {:?}", dir)
            })?;

            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                let matches_extension = path
                    .file_name()
                    .map(|n| n.to_string_lossy().ends_with(extension))
                    .unwrap_or(false);

                if path.is_file() && matches_extension {
                    files.push(path);
                }
            }
        }

        let curr = 0_usize;

        Ok(Self { curr, files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Iterator for ReadFileDiscovery {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.files.get(self.curr).cloned();
        self.curr += 1;
        result
    }
}

///
/// How a sample label is derived from a read file name.
///
/// The source naming scheme encodes the sample as the file name minus a
/// fixed-length tail; a capture pattern covers schemes fixed-length
/// stripping cannot express.
///
#[derive(Debug, Clone)]
pub enum SampleLabeler {
    /// Drop the extensions, then a fixed number of trailing characters.
    StripSuffix(usize),
    /// First capture group of the pattern, applied to the full file name.
    Pattern(Regex),
}

impl Default for SampleLabeler {
    fn default() -> Self {
        SampleLabeler::StripSuffix(0)
    }
}

impl SampleLabeler {
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid label pattern: {}", pattern))?;

        Ok(SampleLabeler::Pattern(pattern))
    }

    pub fn label_for(&self, path: &Path) -> Result<String, BarqError> {
        match self {
            SampleLabeler::StripSuffix(n) => {
                let stem = remove_all_extensions(path);
                let keep = stem.chars().count().saturating_sub(*n);
                Ok(stem.chars().take(keep).collect())
            }
            SampleLabeler::Pattern(pattern) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                pattern
                    .captures(&file_name)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str().to_string())
                    .ok_or_else(|| BarqError::LabelPatternMismatch {
                        pattern: pattern.to_string(),
                        file: file_name,
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_discovery_filters_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample1.fastq"), "").unwrap();
        std::fs::write(dir.path().join("sample2.fastq"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files: Vec<PathBuf> = ReadFileDiscovery::new(&[dir.path()], ".fastq")
            .unwrap()
            .collect();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.to_string_lossy().ends_with(".fastq")));
    }

    #[rstest]
    fn test_discovery_spans_directories_in_argument_order() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::write(dir_a.path().join("a.fastq"), "").unwrap();
        std::fs::write(dir_b.path().join("b.fastq"), "").unwrap();

        let files: Vec<PathBuf> =
            ReadFileDiscovery::new(&[dir_b.path(), dir_a.path()], ".fastq")
                .unwrap()
                .collect();

        assert_eq!(files.len(), 2);
        assert!(files[0].starts_with(dir_b.path()));
        assert!(files[1].starts_with(dir_a.path()));
    }

    #[rstest]
    fn test_discovery_of_missing_directory_fails() {
        let result = ReadFileDiscovery::new(&[Path::new("/no/such/directory")], ".fastq");

        assert!(result.is_err());
    }

    #[rstest]
    #[case(0, "day0_S1", "day0_S1")]
    #[case(3, "day0_S1", "day0")]
    fn test_strip_suffix_label(#[case] n: usize, #[case] stem: &str, #[case] expected: &str) {
        let labeler = SampleLabeler::StripSuffix(n);
        let path = PathBuf::from(format!("{}.fastq.gz", stem));

        assert_eq!(labeler.label_for(&path).unwrap(), expected);
    }

    #[rstest]
    fn test_pattern_label_takes_first_capture() {
        let labeler = SampleLabeler::Pattern(Regex::new(r"^(.+)_S\d+\.fastq$").unwrap());

        let label = labeler.label_for(Path::new("day0_S1.fastq")).unwrap();
        assert_eq!(label, "day0");
    }

    #[rstest]
    fn test_pattern_label_mismatch_is_an_error() {
        let labeler = SampleLabeler::Pattern(Regex::new(r"^(.+)_S\d+\.fastq$").unwrap());

        let result = labeler.label_for(Path::new("day0.fastq"));
        assert!(matches!(result, Err(BarqError::LabelPatternMismatch { .. })));
    }
}
