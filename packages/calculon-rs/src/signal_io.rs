//! Signal loading and saving.
//!
//! Supported formats:
//! - NumPy `.npy` (little-endian `f8` or `f4`, any shape, flattened)
//! - Plain text / CSV with one or more samples per line
//!
//! Text format assumptions:
//! - Samples are separated by whitespace, commas or newlines
//! - Blank lines and lines starting with `#` are ignored
//! - A first data line that does not parse as numbers is treated as a header

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use memmap2::Mmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const NPY_ALIGNMENT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Npy,
    Text,
    Csv,
}

impl FileType {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "npy" => Some(FileType::Npy),
            "txt" | "ascii" | "dat" => Some(FileType::Text),
            "csv" => Some(FileType::Csv),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension).ok_or_else(|| {
            FilterError::UnsupportedFileType(format!(
                "'{}' (supported: npy, txt, ascii, dat, csv)",
                path.display()
            ))
        })
    }
}

/// Load a signal, choosing the format from the file extension
pub fn load_signal<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let file_type = FileType::from_path(path)?;
    if !path.exists() {
        return Err(FilterError::FileNotFound(path.display().to_string()));
    }

    log::debug!("Loading {:?} signal from {}", file_type, path.display());
    let signal = match file_type {
        FileType::Npy => parse_npy(&mmap_file(path)?)?,
        FileType::Text | FileType::Csv => read_text(path)?,
    };
    log::debug!("Loaded {} samples", signal.len());
    Ok(signal)
}

/// Save a signal, choosing the format from the file extension
pub fn save_signal<P: AsRef<Path>>(signal: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    let file_type = FileType::from_path(path)?;
    log::debug!(
        "Saving {} samples as {:?} to {}",
        signal.len(),
        file_type,
        path.display()
    );

    let mut writer = BufWriter::new(File::create(path)?);
    match file_type {
        FileType::Npy => write_npy(signal, &mut writer)?,
        FileType::Text | FileType::Csv => write_text(signal, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Open a file and map it into memory (read-only)
fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap)
}

// =============================================================================
// NPY
// =============================================================================

/// Decode the contents of a `.npy` file
pub fn parse_npy(bytes: &[u8]) -> Result<Vec<f64>> {
    if bytes.len() < 10 || &bytes[..NPY_MAGIC.len()] != NPY_MAGIC {
        return Err(FilterError::ParseError("not a NumPy file".to_string()));
    }

    let major = bytes[6];
    let (header_len, header_start): (usize, usize) = match major {
        1 => (LittleEndian::read_u16(&bytes[8..10]) as usize, 10),
        2 | 3 if bytes.len() >= 12 => (LittleEndian::read_u32(&bytes[8..12]) as usize, 12),
        _ => {
            return Err(FilterError::ParseError(format!(
                "unsupported NumPy format version {}.{}",
                major, bytes[7]
            )))
        }
    };

    let header_end = header_start.saturating_add(header_len);
    if bytes.len() < header_end {
        return Err(FilterError::ParseError("truncated NumPy header".to_string()));
    }
    let header = std::str::from_utf8(&bytes[header_start..header_end])
        .map_err(|e| FilterError::ParseError(format!("NumPy header is not text: {}", e)))?;

    let descr = quoted_field(header, "descr")?;
    let shape = shape_field(header)?;
    let fortran_order = header_field(header, "fortran_order")?.starts_with("True");
    if fortran_order && shape.iter().filter(|&&d| d > 1).count() > 1 {
        return Err(FilterError::ParseError(
            "Fortran-ordered multi-dimensional arrays are not supported".to_string(),
        ));
    }

    let count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| FilterError::ParseError(format!("shape {:?} is too large", shape)))?;
    let data = &bytes[header_end..];
    let item_size = match descr {
        "<f8" => 8,
        "<f4" => 4,
        other => {
            return Err(FilterError::ParseError(format!(
                "unsupported dtype '{}', expected '<f8' or '<f4'",
                other
            )))
        }
    };
    let data_len = count
        .checked_mul(item_size)
        .filter(|&needed| needed <= data.len())
        .ok_or_else(|| {
            FilterError::ParseError(format!(
                "expected {} samples but data section holds {} bytes",
                count,
                data.len()
            ))
        })?;
    let data = &data[..data_len];

    let mut signal = vec![0.0; count];
    if item_size == 8 {
        LittleEndian::read_f64_into(data, &mut signal);
    } else {
        let mut narrow = vec![0.0f32; count];
        LittleEndian::read_f32_into(data, &mut narrow);
        for (wide, &value) in signal.iter_mut().zip(&narrow) {
            *wide = f64::from(value);
        }
    }
    Ok(signal)
}

/// Text following `'key':` in a NumPy header dictionary
fn header_field<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let pattern = format!("'{}':", key);
    let start = header
        .find(&pattern)
        .ok_or_else(|| FilterError::ParseError(format!("NumPy header has no '{}' entry", key)))?;
    Ok(header[start + pattern.len()..].trim_start())
}

fn quoted_field<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let rest = header_field(header, key)?;
    rest.strip_prefix('\'')
        .and_then(|r| r.split('\'').next())
        .ok_or_else(|| FilterError::ParseError(format!("malformed '{}' entry", key)))
}

fn shape_field(header: &str) -> Result<Vec<usize>> {
    let rest = header_field(header, "shape")?;
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.split(')').next())
        .ok_or_else(|| FilterError::ParseError("malformed 'shape' entry".to_string()))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.parse::<usize>()
                .map_err(|_| FilterError::ParseError(format!("invalid dimension '{}'", dim)))
        })
        .collect()
}

fn write_npy<W: Write>(signal: &[f64], writer: &mut W) -> Result<()> {
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({},), }}",
        signal.len()
    );
    // magic + version + u16 length + header + trailing newline
    let unpadded = NPY_MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (NPY_ALIGNMENT - unpadded % NPY_ALIGNMENT) % NPY_ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    writer.write_all(NPY_MAGIC)?;
    writer.write_u8(1)?;
    writer.write_u8(0)?;
    writer.write_u16::<LittleEndian>(header.len() as u16)?;
    writer.write_all(header.as_bytes())?;
    for &sample in signal {
        writer.write_f64::<LittleEndian>(sample)?;
    }
    Ok(())
}

// =============================================================================
// TEXT / CSV
// =============================================================================

fn read_text(path: &Path) -> Result<Vec<f64>> {
    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    parse_text(&lines)
}

fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Parse text lines into samples, in file order
pub fn parse_text<S: AsRef<str> + Sync>(lines: &[S]) -> Result<Vec<f64>> {
    let first_data = lines.iter().position(|l| is_data_line(l.as_ref()));
    let Some(first_data) = first_data else {
        log::warn!("Signal file contains no samples");
        return Ok(Vec::new());
    };

    let has_header = tokens(lines[first_data].as_ref()).any(|t| t.parse::<f64>().is_err());
    let data_start = if has_header { first_data + 1 } else { first_data };
    if has_header {
        log::debug!("Skipping header line {}", first_data + 1);
    }

    let rows: Vec<Vec<f64>> = lines
        .par_iter()
        .enumerate()
        .skip(data_start)
        .map(|(line_idx, line)| {
            let line: &str = line.as_ref();
            (line_idx, line)
        })
        .filter(|(_, line)| is_data_line(line))
        .map(|(line_idx, line)| {
            tokens(line)
                .map(|token| {
                    token.parse::<f64>().map_err(|_| {
                        FilterError::ParseError(format!(
                            "invalid numeric value '{}' at line {}",
                            token,
                            line_idx + 1
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(rows.into_iter().flatten().collect())
}

fn write_text<W: Write>(signal: &[f64], writer: &mut W) -> Result<()> {
    for sample in signal {
        writeln!(writer, "{}", sample)?;
    }
    Ok(())
}
