use log::debug;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Compresses the files directly inside `dir` into `archive`, flat, by
/// basename and in name order. Returns the number of entries written.
///
/// The archive is assembled next to its destination and renamed into place,
/// so `archive` only ever exists complete.
pub fn write_dir(dir: &Path, archive: &Path) -> Result<usize> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let partial = partial_path(archive);
    debug!("Creating {}", partial.display());
    if let Err(e) = write_entries(&files, &partial) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    fs::rename(&partial, archive)?;
    Ok(files.len())
}

fn write_entries(files: &[PathBuf], partial: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(partial)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let Some(name) = path.file_name() else {
            continue;
        };
        zip.start_file(name.to_string_lossy().into_owned(), options)?;
        zip.write_all(&fs::read(path)?)?;
    }

    zip.finish()?.sync_all()?;
    Ok(())
}

/// Reads every member of `archive` to the end so each CRC-32 is checked.
/// Returns the number of members of a sound archive.
pub fn verify(archive: &Path) -> Result<usize> {
    let corrupt = |source| Error::CorruptSource {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(corrupt)?;
    for i in 0..zip.len() {
        let mut member = zip.by_index(i).map_err(corrupt)?;
        io::copy(&mut member, &mut io::sink()).map_err(|e| corrupt(e.into()))?;
    }
    Ok(zip.len())
}

/// Member names in archive order.
pub fn entry_names(archive: &Path) -> Result<Vec<String>> {
    let zip = ZipArchive::new(File::open(archive)?)?;
    Ok(zip.file_names().map(String::from).collect())
}

fn partial_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
