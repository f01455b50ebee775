use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::model::config::ParseOptions;
use crate::model::document::Document;
use crate::parse::{MetadataError, parse_document, serialize_document};

/// Error type for loading and saving a checklist file
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{path} changed on disk since it was loaded; reload or force-save")]
    WriteConflict { path: PathBuf },
    #[error("document is read-only")]
    ReadOnly,
    #[error("{path} is not valid UTF-8; refusing to open it")]
    InvalidUtf8 { path: PathBuf },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a file looked like when we last read or wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub modified: Option<SystemTime>,
    pub len: u64,
    /// Hex SHA-256 of the content
    pub sha256: String,
}

impl Fingerprint {
    pub fn of(bytes: &[u8], modified: Option<SystemTime>) -> Self {
        Fingerprint {
            modified,
            len: bytes.len() as u64,
            sha256: hex_digest(bytes),
        }
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Read a file and fingerprint it. `None` when the file does not exist.
fn read_with_fingerprint(path: &Path) -> Result<Option<(Vec<u8>, Fingerprint)>, DocumentError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DocumentError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
    let fingerprint = Fingerprint::of(&bytes, modified);
    Ok(Some((bytes, fingerprint)))
}

fn current_fingerprint(path: &Path) -> Result<Option<Fingerprint>, DocumentError> {
    Ok(read_with_fingerprint(path)?.map(|(_, fp)| fp))
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// A loaded document
#[derive(Debug)]
pub struct Loaded {
    pub file: DocumentFile,
    pub document: Document,
    /// Problem found in the frontmatter, if any
    pub warning: Option<MetadataError>,
}

/// The on-disk side of an open document. Saves are refused when the file
/// no longer matches what was loaded.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub path: PathBuf,
    /// `None` when the file did not exist
    fingerprint: Option<Fingerprint>,
    pub read_only: bool,
}

impl DocumentFile {
    /// Load `path`, or start from the template when it does not exist
    pub fn open(path: &Path, options: &ParseOptions) -> Result<Loaded, DocumentError> {
        let mut file = DocumentFile {
            path: path.to_path_buf(),
            fingerprint: None,
            read_only: false,
        };
        let (document, warning) = file.read(options)?;
        Ok(Loaded {
            file,
            document,
            warning,
        })
    }

    pub fn exists(&self) -> bool {
        self.fingerprint.is_some()
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    fn read(&mut self, options: &ParseOptions) -> Result<(Document, Option<MetadataError>), DocumentError> {
        match read_with_fingerprint(&self.path)? {
            Some((bytes, fingerprint)) => {
                // Lossy decoding would rewrite the bad bytes on the next save
                let text = String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8 {
                    path: self.path.clone(),
                })?;
                tracing::debug!(path = %self.path.display(), bytes = fingerprint.len, "loaded document");
                self.fingerprint = Some(fingerprint);
                let (document, warning) = parse_document(&text, options);
                if let Some(w) = &warning {
                    tracing::warn!(path = %self.path.display(), "frontmatter: {}", w);
                }
                Ok((document, warning))
            }
            None => {
                tracing::debug!(path = %self.path.display(), "file absent, using template");
                self.fingerprint = None;
                Ok((Document::template(), None))
            }
        }
    }

    /// Whether the file on disk differs from what we last read or wrote
    pub fn changed_on_disk(&self) -> Result<bool, DocumentError> {
        Ok(current_fingerprint(&self.path)? != self.fingerprint)
    }

    /// Save unless the file changed underneath us
    pub fn save(&mut self, doc: &Document, options: &ParseOptions) -> Result<(), DocumentError> {
        if self.read_only {
            return Err(DocumentError::ReadOnly);
        }
        if self.changed_on_disk()? {
            tracing::warn!(path = %self.path.display(), "write conflict, save refused");
            return Err(DocumentError::WriteConflict {
                path: self.path.clone(),
            });
        }
        self.write(doc, options)
    }

    /// Save without checking for external changes
    pub fn force_save(&mut self, doc: &Document, options: &ParseOptions) -> Result<(), DocumentError> {
        if self.read_only {
            return Err(DocumentError::ReadOnly);
        }
        self.write(doc, options)
    }

    fn write(&mut self, doc: &Document, options: &ParseOptions) -> Result<(), DocumentError> {
        let text = serialize_document(doc, options);
        atomic_write(&self.path, text.as_bytes())?;
        self.fingerprint = current_fingerprint(&self.path)?;
        tracing::info!(path = %self.path.display(), items = doc.len(), "saved document");
        Ok(())
    }

    /// Re-read the file, replacing the recorded fingerprint
    pub fn reload(&mut self, options: &ParseOptions) -> Result<(Document, Option<MetadataError>), DocumentError> {
        tracing::info!(path = %self.path.display(), "reloading document");
        self.read(options)
    }
}
