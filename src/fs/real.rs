use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).context(format!("Failed to read file {:?}", path))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).context(format!("Failed to open file {:?}", path))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if path.is_file() {
                FileType::File
            } else if path.is_dir() {
                FileType::Directory
            } else {
                FileType::Other
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_app() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir_all(base.join("META-INF")).unwrap();
        fs::create_dir_all(base.join("BOOT-INF/lib")).unwrap();
        fs::write(base.join("META-INF/MANIFEST.MF"), "Spring-Boot-Version: 3.2.0\n").unwrap();
        fs::write(base.join("BOOT-INF/lib/b-1.0.jar"), b"bravo").unwrap();
        fs::write(base.join("BOOT-INF/lib/a-1.0.jar"), b"alpha").unwrap();

        dir
    }

    #[test]
    fn test_is_dir_and_is_file() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        assert!(fs.is_dir(&temp.path().join("BOOT-INF/lib")));
        assert!(!fs.is_dir(&temp.path().join("META-INF/MANIFEST.MF")));
        assert!(fs.is_file(&temp.path().join("META-INF/MANIFEST.MF")));
        assert!(!fs.is_file(temp.path()));
        assert!(!fs.is_file(&temp.path().join("nonexistent")));
        assert!(!fs.is_dir(&temp.path().join("nonexistent")));
    }

    #[test]
    fn test_read_to_string() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        let content = fs
            .read_to_string(&temp.path().join("META-INF/MANIFEST.MF"))
            .unwrap();
        assert_eq!(content, "Spring-Boot-Version: 3.2.0\n");
    }

    #[test]
    fn test_read() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        let bytes = fs.read(&temp.path().join("BOOT-INF/lib/a-1.0.jar")).unwrap();
        assert_eq!(bytes, b"alpha");
    }

    #[test]
    fn test_open() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        let mut content = String::new();
        fs.open(&temp.path().join("BOOT-INF/lib/b-1.0.jar"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "bravo");

        let error = fs.open(&temp.path().join("missing.jar")).err().unwrap();
        assert!(error.to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_read_dir_is_sorted() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(&temp.path().join("BOOT-INF/lib")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();

        assert_eq!(names, vec!["a-1.0.jar", "b-1.0.jar"]);
        assert!(entries.iter().all(|e| e.is_file()));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let temp = create_test_app();
        let fs = RealFileSystem::new();

        let result = fs.read_to_string(&temp.path().join("missing.txt"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read file"));
    }
}
