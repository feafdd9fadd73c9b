//! Input reading: raw files and zip archives.
//!
//! The whole input is read into memory before any scanning begins; the
//! search operates on in-memory buffers only. Zip archives list their
//! entries and ask the operator which one to evaluate.

use crate::error::{LockeError, Result};
use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Read a raw file into memory.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Read one entry of a zip archive by 1-based index, optionally
/// decrypting with `password`.
pub fn read_zip_entry(path: &Path, index: usize, password: Option<&str>) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let count = archive.len();
    if count == 0 {
        return Err(LockeError::EmptyArchive {
            path: path.to_path_buf(),
        });
    }
    if index == 0 || index > count {
        return Err(LockeError::ZipEntryOutOfRange { index, count });
    }
    let mut entry = match password {
        Some(pw) => archive.by_index_decrypt(index - 1, pw.as_bytes())?,
        None => archive.by_index(index - 1)?,
    };
    let mut data = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut data)?;
    Ok(data)
}

/// The entry names of a zip archive, in index order.
pub fn zip_entry_names(path: &Path) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index_raw(i)?.name().to_string());
    }
    Ok(names)
}

/// Present the entry list to the operator, read their selection from
/// stdin, and return the chosen entry's bytes.
pub fn read_zip_interactive(path: &Path, password: Option<&str>) -> Result<Vec<u8>> {
    let names = zip_entry_names(path)?;
    if names.is_empty() {
        return Err(LockeError::EmptyArchive {
            path: path.to_path_buf(),
        });
    }

    println!("What file do you want to evaluate:");
    for (i, name) in names.iter().enumerate() {
        println!("{}: {}", i + 1, name);
    }
    print!("1 - {}: ", names.len());
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let index: usize = line
        .trim()
        .parse()
        .map_err(|_| LockeError::InvalidEntrySelection {
            input: line.trim().to_string(),
        })?;

    read_zip_entry(path, index, password)
}
