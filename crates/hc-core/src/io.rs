//! Reading and writing histogram sets.
//!
//! Sets are stored as JSON; a path ending in `.gz` is transparently
//! gzip-compressed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::info;

use crate::error::InputError;
use crate::set::HistogramSet;

fn is_gzip(path: &Path) -> bool {
    path.extension().map(|e| e == "gz").unwrap_or(false)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> InputError {
    let path = path.to_path_buf();
    move |source| InputError::Io { path, source }
}

/// Load and validate a histogram set.
pub fn load_set(path: impl AsRef<Path>) -> Result<HistogramSet, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(path))?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let set: HistogramSet = serde_json::from_reader(reader).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    set.validate()?;

    info!("loaded {} objects from {}", set.len(), path.display());
    Ok(set)
}

/// Write a histogram set, pretty-printed. Sets with NaN or infinite
/// cells are rejected before the file is touched.
pub fn save_set(set: &HistogramSet, path: impl AsRef<Path>) -> Result<(), InputError> {
    let path = path.as_ref();
    set.check_finite()?;
    let file = File::create(path).map_err(io_error(path))?;

    if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_json(set, &mut encoder, path)?;
        encoder
            .finish()
            .and_then(|mut inner| inner.flush())
            .map_err(io_error(path))?;
    } else {
        let mut writer = BufWriter::new(file);
        write_json(set, &mut writer, path)?;
        writer.flush().map_err(io_error(path))?;
    }

    info!("wrote {} objects to {}", set.len(), path.display());
    Ok(())
}

fn write_json<W: Write>(set: &HistogramSet, writer: W, path: &Path) -> Result<(), InputError> {
    serde_json::to_writer_pretty(writer, set).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Derive an output path next to `input`: `dir/<stem><suffix>.json`,
/// keeping a trailing `.gz`.
pub fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let gz = is_gzip(input);
    let mut stem = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if gz {
        stem.truncate(stem.len() - ".gz".len());
    }
    if let Some(dot) = stem.rfind('.') {
        stem.truncate(dot);
    }

    let mut name = format!("{}{}.json", stem, suffix);
    if gz {
        name.push_str(".gz");
    }
    input.with_file_name(name)
}

/// File stem of a set path without `.json` / `.json.gz`.
pub fn set_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.to_string(),
    }
}
