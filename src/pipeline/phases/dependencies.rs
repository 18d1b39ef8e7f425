//! `dependencies` BOM entry built from the application's packaged jars

use super::manifest_dir;
use crate::buildpack::BomEntry;
use crate::fs::FileSystem;
use crate::parsers::manifest::SPRING_BOOT_LIB;
use crate::parsers::Manifest;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

pub const BOM_ENTRY_NAME: &str = "dependencies";
pub const DEFAULT_LIB: &str = "BOOT-INF/lib";
pub const APPLICATION_LAYER: &str = "application";

/// `<name>-<version>.jar`, where the version is the longest suffix starting with a digit.
const JAR_FILENAME_PATTERN: &str = r"^(.+?)-(\d[^/\\]*)\.jar$";

/// A packaged dependency jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenJar {
    pub name: String,
    pub version: String,
    pub sha256: String,
}

pub struct JarNameParser {
    pattern: Regex,
}

impl JarNameParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(JAR_FILENAME_PATTERN)?,
        })
    }

    /// Split a jar file name into `(name, version)`.
    pub fn parse<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str)> {
        let captures = self.pattern.captures(file_name)?;
        let name = captures.get(1)?.as_str();
        let version = captures.get(2)?.as_str();
        Some((name, version))
    }
}

/// Hex SHA-256 of everything `reader` yields, read in buffered chunks.
pub fn sha256_hex(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Scan the lib directory (top level only) for jars.
///
/// A missing directory yields no jars; files that do not look like
/// `<name>-<version>.jar` are skipped.
pub fn scan(fs: &dyn FileSystem, lib_dir: &Path) -> Result<Vec<MavenJar>> {
    if !fs.is_dir(lib_dir) {
        debug!("No dependency directory at {:?}", lib_dir);
        return Ok(Vec::new());
    }

    let parser = JarNameParser::new()?;
    let mut jars = Vec::new();

    for entry in fs.read_dir(lib_dir)? {
        if !entry.is_file() {
            continue;
        }

        let Some((name, version)) = parser.parse(entry.file_name()) else {
            debug!("Skipping {}: not a versioned jar", entry.file_name());
            continue;
        };

        let sha256 = fs
            .open(entry.path())
            .and_then(|reader| Ok(sha256_hex(reader)?))
            .with_context(|| format!("Failed to digest {:?}", entry.path()))?;

        jars.push(MavenJar {
            name: name.to_string(),
            version: version.to_string(),
            sha256,
        });
    }

    Ok(jars)
}

pub fn execute(
    fs: &dyn FileSystem,
    application_path: &Path,
    manifest: &Manifest,
) -> Result<BomEntry> {
    let lib_dir = manifest_dir(application_path, manifest, SPRING_BOOT_LIB, DEFAULT_LIB);
    let jars = scan(fs, &lib_dir)?;
    info!(count = jars.len(), "Recorded application dependencies");

    let mut metadata = Map::new();
    metadata.insert("layer".to_string(), json!(APPLICATION_LAYER));
    metadata.insert(
        "dependencies".to_string(),
        serde_json::to_value(&jars).context("Failed to serialize dependencies")?,
    );

    Ok(BomEntry::launch(BOM_ENTRY_NAME, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use yare::parameterized;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[parameterized(
        simple = { "test-file-2.2.2.jar", Some(("test-file", "2.2.2")) },
        qualifier = { "spring-boot-2.3.0.RELEASE.jar", Some(("spring-boot", "2.3.0.RELEASE")) },
        snapshot = { "demo-lib-1.0.0-SNAPSHOT.jar", Some(("demo-lib", "1.0.0-SNAPSHOT")) },
        digit_in_name = { "log4j-api-2.17.1.jar", Some(("log4j-api", "2.17.1")) },
        single_digit = { "jsr305-3.jar", Some(("jsr305", "3")) },
        no_version = { "application.jar", None },
        not_a_jar = { "notes-1.0.txt", None },
        version_not_numeric = { "foo-bar.jar", None },
        missing_name = { "-1.0.jar", None },
    )]
    fn test_parse_jar_name(file_name: &str, expected: Option<(&str, &str)>) {
        let parser = JarNameParser::new().unwrap();
        assert_eq!(parser.parse(file_name), expected);
    }

    #[test]
    fn test_sha256_of_empty_input() {
        assert_eq!(sha256_hex(&b""[..]).unwrap(), EMPTY_SHA256);
    }

    #[test]
    fn test_sha256_of_content() {
        assert_eq!(
            sha256_hex(&b"hello world"[..]).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha256_streams_large_content() {
        let content: Vec<u8> = (0..=255u8).cycle().take(1 << 20).collect();
        let streamed = sha256_hex(io::Cursor::new(&content)).unwrap();

        assert_eq!(streamed, hex::encode(Sha256::digest(&content)));
    }

    #[test]
    fn test_scan_large_jar() {
        let fs = MockFileSystem::new();
        let content = vec![0x5a; 3 * 64 * 1024 + 17];
        fs.add_binary("BOOT-INF/lib/big-1.0.jar", &content);

        let jars = scan(&fs, Path::new("/mock/BOOT-INF/lib")).unwrap();

        assert_eq!(jars.len(), 1);
        assert_eq!(jars[0].sha256, hex::encode(Sha256::digest(&content)));
    }

    #[test]
    fn test_scan_missing_directory() {
        let fs = MockFileSystem::new();
        assert!(scan(&fs, Path::new("/mock/BOOT-INF/lib")).unwrap().is_empty());
    }

    #[test]
    fn test_scan_is_top_level_only_and_sorted() {
        let fs = MockFileSystem::new();
        fs.add_file("BOOT-INF/lib/zeta-1.0.jar", "");
        fs.add_file("BOOT-INF/lib/alpha-2.0.jar", "hello world");
        fs.add_file("BOOT-INF/lib/README", "ignored");
        fs.add_file("BOOT-INF/lib/nested/inner-1.0.jar", "");

        let jars = scan(&fs, Path::new("/mock/BOOT-INF/lib")).unwrap();

        assert_eq!(
            jars,
            vec![
                MavenJar {
                    name: "alpha".to_string(),
                    version: "2.0".to_string(),
                    sha256: sha256_hex(&b"hello world"[..]).unwrap(),
                },
                MavenJar {
                    name: "zeta".to_string(),
                    version: "1.0".to_string(),
                    sha256: EMPTY_SHA256.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_execute_uses_spring_boot_lib() {
        let fs = MockFileSystem::new();
        fs.add_file("WEB-INF/lib/test-file-2.2.2.jar", "");
        fs.add_file("BOOT-INF/lib/ignored-1.0.0.jar", "");
        let manifest = Manifest::parse("Spring-Boot-Version: 1.1.1\nSpring-Boot-Lib: WEB-INF/lib/\n");

        let entry = execute(&fs, Path::new("/mock"), &manifest).unwrap();

        assert_eq!(entry.name, BOM_ENTRY_NAME);
        assert!(entry.launch);
        assert!(!entry.build);
        assert_eq!(entry.metadata["layer"], json!("application"));
        assert_eq!(
            entry.metadata["dependencies"],
            json!([{ "name": "test-file", "version": "2.2.2", "sha256": EMPTY_SHA256 }])
        );
    }

    #[test]
    fn test_execute_without_jars_still_emits_entry() {
        let fs = MockFileSystem::new();
        let manifest = Manifest::parse("Spring-Boot-Version: 1.1.1\n");

        let entry = execute(&fs, Path::new("/mock"), &manifest).unwrap();

        assert_eq!(entry.name, BOM_ENTRY_NAME);
        assert_eq!(entry.metadata["dependencies"], json!([]));
    }
}
