//! FileSystem trait definition

use anyhow::Result;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Other,
}

/// A directory entry returned by read_dir
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }
}

/// Read-only view of the application tree handed over by the lifecycle.
///
/// Every build reads through this trait so the decision logic can run against
/// an unpacked application on disk or an in-memory fixture.
pub trait FileSystem: Send + Sync {
    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read the full file contents
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Open a file for streaming reads
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// List directory contents, sorted by file name
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
}
