//! File-backed inputs and outputs for tests.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary file removed on drop.
pub struct TempFilePath {
    _file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    pub fn new() -> io::Result<Self> {
        let file = NamedTempFile::new()?;
        let path = file.path().to_path_buf();
        Ok(Self { _file: file, path })
    }

    pub fn with_extension(extension: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = file.path().to_path_buf();
        Ok(Self { _file: file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `contents` to a fresh temporary file.
pub fn mock_input_file(contents: &str) -> io::Result<TempFilePath> {
    let temp = TempFilePath::with_extension("tsv")?;
    let mut file = File::create(temp.path())?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(temp)
}

/// Open `path` as task input.
pub fn open_input(path: impl AsRef<Path>) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

/// Read a task's output file back as text.
pub fn read_output(path: impl AsRef<Path>) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// An in-memory input that fails exactly once when it reaches byte `fail_at`,
/// then reads on as if nothing happened.
pub struct FlakyReader {
    data: Cursor<Vec<u8>>,
    fail_at: u64,
    failed: bool,
}

impl FlakyReader {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, fail_at: u64) -> Self {
        Self {
            data: Cursor::new(data.into()),
            fail_at,
            failed: false,
        }
    }
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failed {
            return self.data.read(buf);
        }
        let before = self.fail_at.saturating_sub(self.data.position());
        if before == 0 {
            self.failed = true;
            return Err(io::Error::other("transient read failure"));
        }
        let len = buf.len().min(usize::try_from(before).unwrap_or(usize::MAX));
        self.data.read(&mut buf[..len])
    }
}
