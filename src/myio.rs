use flate2::read;
use flate2::write;
use flate2::Compression;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn is_gz(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

/// Write normal or compressed files seamlessly
/// Uses the presence of a `.gz` extension to decide
pub fn writer<P: AsRef<Path>>(filename: P) -> io::Result<Box<dyn Write>> {
    let path = filename.as_ref();
    let file = File::create(path)?;
    if is_gz(path) {
        Ok(Box::new(BufWriter::with_capacity(
            128 * 1024,
            write::GzEncoder::new(file, Compression::default()),
        )))
    } else {
        Ok(Box::new(BufWriter::with_capacity(128 * 1024, file)))
    }
}

/// Read normal or compressed files seamlessly
/// Uses the presence of a `.gz` extension to decide
pub fn reader<P: AsRef<Path>>(filename: P) -> io::Result<Box<dyn BufRead>> {
    let path = filename.as_ref();
    let file = File::open(path)?;
    if is_gz(path) {
        Ok(Box::new(BufReader::with_capacity(
            128 * 1024,
            read::GzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(128 * 1024, file)))
    }
}

/// The input file name up to its first `.`, kept in the same directory.
/// # Example
/// ```
/// use castools::myio::basename;
/// use std::path::PathBuf;
/// assert_eq!(basename("run1.cas.tab"), PathBuf::from("run1"));
/// assert_eq!(basename("data/run1.cas.tab.gz"), PathBuf::from("data/run1"));
/// assert_eq!(basename("noext"), PathBuf::from("noext"));
/// ```
pub fn basename<P: AsRef<Path>>(filename: P) -> PathBuf {
    let path = filename.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    match path.parent() {
        Some(dir) => dir.join(stem),
        None => PathBuf::from(stem),
    }
}

/// `<basename>.<ext>` next to the input file.
pub fn sibling<P: AsRef<Path>>(filename: P, ext: &str) -> PathBuf {
    let mut out = basename(filename).into_os_string();
    out.push(".");
    out.push(ext);
    PathBuf::from(out)
}
