//! Uploaded spreadsheets and their per-request scratch files
//!
//! calamine picks its decoder from the file extension, so every upload is
//! written to a uniquely named file in the scratch directory before parsing.
//! The file belongs to a `ScratchFile` guard and is removed when the guard
//! drops, whichever way the request ends.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::core::{MatchEngine, SearchRequest};
use crate::error::{MatchError, MatchResult};
use crate::excel::{supported_extension, WorkbookReader, SUPPORTED_EXTENSIONS};
use crate::report::Outcome;

/// A file as received from the client
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Spreadsheet extension of the upload, after checking it is usable
    pub fn extension(&self) -> MatchResult<String> {
        if self.file_name.trim().is_empty() || self.bytes.is_empty() {
            return Err(MatchError::EmptySelection);
        }
        supported_extension(&self.file_name).ok_or_else(|| {
            MatchError::Parse(format!(
                "unsupported file type \"{}\" (expected one of: {})",
                self.file_name,
                SUPPORTED_EXTENSIONS.join(", ")
            ))
        })
    }
}

/// Exclusively owned scratch copy of one upload; deleted on drop
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn create(dir: &Path, extension: &str, bytes: &[u8]) -> MatchResult<Self> {
        let mut file = Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", extension))
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), size = bytes.len(), "scratch file created");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Scratch directory shared by all requests; each request gets its own file
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Use `root`, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> MatchResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn store(&self, upload: &Upload) -> MatchResult<ScratchFile> {
        let extension = upload.extension()?;
        ScratchFile::create(&self.root, &extension, &upload.bytes)
    }
}

/// Store, decode and search one upload.
///
/// The scratch file lives only for the duration of this call.
pub fn search_upload(
    engine: &MatchEngine,
    scratch: &ScratchDir,
    upload: &Upload,
    request: &SearchRequest,
) -> MatchResult<Outcome> {
    let file = scratch.store(upload)?;
    let workbook = WorkbookReader::new(file.path()).read()?;
    drop(file);
    engine.run(&workbook, request)
}
