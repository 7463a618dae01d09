use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::Error;
use crate::reader;
use crate::table::Table;

/// An opened GTFS archive, fully buffered in memory.
///
/// GTFS feeds are small enough that buffering the whole ZIP is much simpler
/// than streaming, for both local files and remote downloads. The buffer
/// lives only as long as the `FeedArchive`.
pub struct FeedArchive {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl FeedArchive {
    /// Opens a feed source, guessing between a remote URL and a local path.
    pub fn open(source: &str) -> Result<FeedArchive, Error> {
        if is_url(source) {
            FeedArchive::from_url(source)
        } else {
            FeedArchive::from_path(source)
        }
    }

    /// Opens a local ZIP archive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<FeedArchive, Error> {
        let p = path.as_ref();
        let bytes = std::fs::read(p).map_err(|e| Error::FileAccess {
            path: p.display().to_string(),
            source: e,
        })?;
        FeedArchive::from_bytes(bytes)
    }

    /// Fetches and opens a remote ZIP archive. The whole response body is
    /// downloaded before the archive is opened; a non-2xx status is a failure.
    pub fn from_url(url: &str) -> Result<FeedArchive, Error> {
        let fetch_err = |e| Error::Fetch {
            url: url.to_owned(),
            source: e,
        };
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let body = response.bytes().map_err(fetch_err)?;
        FeedArchive::from_bytes(body.to_vec())
    }

    /// Buffers and opens an archive from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<FeedArchive, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        FeedArchive::from_bytes(bytes)
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<FeedArchive, Error> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        Ok(FeedArchive { archive })
    }

    /// The names of every entry in the archive.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }

    /// Reads one named table entry as delimited text.
    ///
    /// `entry_name` is the GTFS file name, e.g. `"agency.txt"`. Entries
    /// nested inside a directory in the archive are matched by their
    /// file-name component.
    pub fn table(&mut self, entry_name: &str) -> Result<Table, Error> {
        let bytes = self.read_entry(entry_name)?;
        reader::parse_table(&bytes, entry_name)
    }

    /// Extracts the full content of one entry, matched by file-name component.
    pub(crate) fn read_entry(&mut self, entry_name: &str) -> Result<Vec<u8>, Error> {
        let full_name = self
            .entry_names()
            .into_iter()
            .find(|n| Path::new(n).file_name() == Some(std::ffi::OsStr::new(entry_name)))
            .ok_or_else(|| Error::MissingFile(entry_name.to_owned()))?;
        let mut entry = self.archive.by_name(&full_name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn is_url(source: &str) -> bool {
    url::Url::parse(source)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
