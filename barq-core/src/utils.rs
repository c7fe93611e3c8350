use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::BarqError;

/// Watson-Crick complement of a single base. Only the unambiguous DNA
/// alphabet {A,C,G,T} is supported; ambiguity codes are a reference-data
/// error.
pub fn complement(base: u8) -> Result<u8, BarqError> {
    match base {
        b'A' => Ok(b'T'),
        b'T' => Ok(b'A'),
        b'C' => Ok(b'G'),
        b'G' => Ok(b'C'),
        _ => Err(BarqError::InvalidBase(base as char)),
    }
}

///
/// Compute the reverse complement of a nucleotide sequence.
///
/// # Arguments
///
/// - seq: a sequence over {A,C,G,T}
///
pub fn reverse_complement(seq: &str) -> Result<String, BarqError> {
    let mut revcomp = String::with_capacity(seq.len());

    for base in seq.bytes().rev() {
        revcomp.push(complement(base)? as char);
    }

    Ok(revcomp)
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Get a writer for either a gzip'd or non-gzip'd file, decided by the
/// file extension.
///
/// # Arguments
///
/// - path: path to the file to create
///
pub fn get_dynamic_writer(path: &Path) -> Result<BufWriter<Box<dyn Write>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let file: Box<dyn Write> = match is_gzipped {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    let writer = BufWriter::new(file);

    Ok(writer)
}

/// Strip every extension from a file name, so `sample1.fastq.gz` and
/// `sample1.fastq` both become `sample1`.
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = path.file_stem().unwrap().to_string_lossy().to_string();

    let mut parent_path = path.with_file_name(stem.clone());
    while let Some(_extension) = parent_path.extension() {
        parent_path = parent_path.with_extension("");
        stem = parent_path
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_string();
    }

    stem
}
