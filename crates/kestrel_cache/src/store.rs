//! On-disk persistence for compiled binaries.
//!
//! Each binary is written to `<root>/binaries/<key-hash>.bin` as a 4-byte
//! little-endian header length, a bincode-encoded [`BinaryHeader`], and the raw
//! payload. The header carries magic bytes, a format version, the writing
//! crate's version, the full routine key, the options fingerprint, and a
//! payload checksum.

use std::path::{Path, PathBuf};

use kestrel_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::binary::CompiledBinary;
use crate::error::CacheError;
use crate::key::RoutineKey;

/// Magic bytes identifying a persisted binary.
const BINARY_MAGIC: [u8; 4] = *b"KSTL";

/// Current file format version. Increment on breaking changes to the header
/// or payload layout.
const BINARY_FORMAT_VERSION: u32 = 1;

const BINARIES_DIR: &str = "binaries";
const BINARY_EXT: &str = "bin";

/// Header prepended to every persisted binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryHeader {
    /// Magic bytes: must be `b"KSTL"`.
    pub magic: [u8; 4],
    /// File format version.
    pub format_version: u32,
    /// Version of the crate that wrote the file.
    pub kestrel_version: String,
    /// The key the binary was compiled for.
    pub key: RoutineKey,
    /// Fingerprint of the build options the binary was compiled with.
    pub options_fingerprint: ContentHash,
    /// Checksum of the payload.
    pub checksum: ContentHash,
}

/// A directory of persisted binaries.
#[derive(Clone, Debug)]
pub struct BinaryStore {
    root: PathBuf,
}

impl BinaryStore {
    /// Creates a store rooted at `root`. Nothing is created on disk until the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn binaries_dir(&self) -> PathBuf {
        self.root.join(BINARIES_DIR)
    }

    /// Returns the file path for `key`.
    pub fn path_for(&self, key: &RoutineKey) -> PathBuf {
        self.binaries_dir()
            .join(format!("{}.{BINARY_EXT}", key.content_hash()))
    }

    /// Writes `binary` for `key`, replacing any existing file.
    pub fn write(&self, key: &RoutineKey, binary: &CompiledBinary) -> Result<PathBuf, CacheError> {
        let dir = self.binaries_dir();
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir,
            source: e,
        })?;

        let header = BinaryHeader {
            magic: BINARY_MAGIC,
            format_version: BINARY_FORMAT_VERSION,
            kestrel_version: env!("CARGO_PKG_VERSION").to_string(),
            key: key.clone(),
            options_fingerprint: binary.options_fingerprint(),
            checksum: ContentHash::from_bytes(binary.bytes()),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + binary.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(binary.bytes());

        let path = self.path_for(key);
        std::fs::write(&path, &output).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Reads the binary for `key`.
    ///
    /// Fail-safe: a missing, corrupted, or foreign file is a miss.
    pub fn read(&self, key: &RoutineKey) -> Option<CompiledBinary> {
        let (header, binary) = self.read_file(&self.path_for(key)).ok()?;
        (header.key == *key).then_some(binary)
    }

    /// Reads and validates one binary file, reporting why it is invalid.
    pub fn read_file(&self, path: &Path) -> Result<(BinaryHeader, CompiledBinary), CacheError> {
        let raw = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let invalid = |reason: &str| CacheError::InvalidHeader {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let len_bytes: [u8; 4] = raw
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| invalid("file too short"))?;
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        let header_end = 4usize
            .checked_add(header_len)
            .filter(|end| *end <= raw.len())
            .ok_or_else(|| invalid("truncated header"))?;

        let (header, _): (BinaryHeader, usize) =
            bincode::serde::decode_from_slice(&raw[4..header_end], bincode::config::standard())
                .map_err(|e| CacheError::Serialization {
                    reason: e.to_string(),
                })?;

        if header.magic != BINARY_MAGIC {
            return Err(invalid("bad magic"));
        }
        if header.format_version != BINARY_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: BINARY_FORMAT_VERSION,
                actual: header.format_version,
            });
        }

        let payload = &raw[header_end..];
        let actual = ContentHash::from_bytes(payload);
        if actual != header.checksum {
            return Err(CacheError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: header.checksum.to_string(),
                actual: actual.to_string(),
            });
        }

        let binary = CompiledBinary::new(payload.to_vec(), header.options_fingerprint);
        Ok((header, binary))
    }

    /// Loads every valid binary in the store. Invalid files are skipped; a
    /// missing directory yields nothing.
    pub fn load_all(&self) -> Result<Vec<(RoutineKey, CompiledBinary)>, CacheError> {
        let dir = self.binaries_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BINARY_EXT) {
                continue;
            }
            match self.read_file(&path) {
                Ok((header, binary)) => loaded.push((header.key, binary)),
                Err(err) => tracing::debug!(path = %path.display(), %err, "skipping binary"),
            }
        }
        Ok(loaded)
    }

    /// Deletes the file for `key`. Returns `false` if there was none.
    pub fn remove(&self, key: &RoutineKey) -> Result<bool, CacheError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_common::Precision;

    fn key(routine: &str) -> RoutineKey {
        RoutineKey::new("gfx906", Precision::Double, routine)
    }

    fn binary(bytes: &[u8]) -> CompiledBinary {
        CompiledBinary::new(bytes.to_vec(), ContentHash::from_parts(&["-cl-mad-enable"]))
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        let path = store.write(&key("XGEMM"), &binary(b"payload")).unwrap();

        assert!(path.starts_with(dir.path().join("binaries")));
        let read = store.read(&key("XGEMM")).unwrap();
        assert_eq!(read, binary(b"payload"));
    }

    #[test]
    fn missing_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        assert!(store.read(&key("XGEMM")).is_none());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupted_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        let path = store.write(&key("XGEMM"), &binary(b"payload")).unwrap();

        let mut raw = std::fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        std::fs::write(&path, raw).unwrap();

        assert!(store.read(&key("XGEMM")).is_none());
        assert!(matches!(
            store.read_file(&path),
            Err(CacheError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        let path = store.write(&key("XGEMM"), &binary(b"payload")).unwrap();
        std::fs::write(&path, [0x40, 0, 0, 0, 1]).unwrap();

        assert!(matches!(
            store.read_file(&path),
            Err(CacheError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn load_all_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        store.write(&key("XGEMM"), &binary(b"a")).unwrap();
        store.write(&key("XAXPY"), &binary(b"b")).unwrap();
        std::fs::write(dir.path().join("binaries").join("junk.bin"), b"xx").unwrap();
        std::fs::write(dir.path().join("binaries").join("notes.txt"), b"ignored").unwrap();

        let mut loaded = store.load_all().unwrap();
        loaded.sort_by(|a, b| a.0.routine.cmp(&b.0.routine));
        let routines: Vec<_> = loaded.iter().map(|(k, _)| k.routine.as_str()).collect();
        assert_eq!(routines, ["XAXPY", "XGEMM"]);
    }

    #[test]
    fn header_keeps_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        let path = store.write(&key("XDOT"), &binary(b"z")).unwrap();
        let (header, _) = store.read_file(&path).unwrap();
        assert_eq!(header.key, key("XDOT"));
        assert_eq!(
            header.options_fingerprint,
            ContentHash::from_parts(&["-cl-mad-enable"])
        );
    }

    #[test]
    fn remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = BinaryStore::new(dir.path());
        store.write(&key("XGEMM"), &binary(b"a")).unwrap();
        assert!(store.remove(&key("XGEMM")).unwrap());
        assert!(!store.remove(&key("XGEMM")).unwrap());
    }
}
