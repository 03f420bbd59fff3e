//! G-code file reading
//!
//! Uploaded G-code is not guaranteed to be valid UTF-8 (some slicers write
//! Latin-1 object names). Files are decoded best-effort: invalid byte
//! sequences are dropped and Windows line endings are normalised.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

/// Files above this size are still read, but with a warning
const LARGE_FILE_WARN_BYTES: u64 = 500 * 1024 * 1024;

/// Decode raw G-code bytes, dropping invalid UTF-8 and normalising `\r\n`
pub fn decode_gcode_lossy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text: String = text.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect();
    text.replace("\r\n", "\n")
}

/// Read a G-code file into memory
///
/// # Errors
/// Returns error if the path is missing, not a file, or unreadable
pub fn read_gcode_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Path is not a file: {}", path.display()));
    }

    let size = fs::metadata(path)?.len();
    if size > LARGE_FILE_WARN_BYTES {
        tracing::warn!(
            "Reading very large file ({}MB) into memory",
            size / (1024 * 1024)
        );
    }

    let bytes = fs::read(path).map_err(|e| anyhow!("Failed to read file: {}", e))?;
    Ok(decode_gcode_lossy(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lossy_decode() {
        let bytes = b"; printing object caf\xe9\r\nG1 X1\r\n";
        assert_eq!(decode_gcode_lossy(bytes), "; printing object caf\nG1 X1\n");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_gcode_file("/definitely/not/here.gcode").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_read_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_gcode_file(dir.path()).is_err());
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"G28\r\nG1 Z5\r\n").unwrap();
        assert_eq!(read_gcode_file(file.path()).unwrap(), "G28\nG1 Z5\n");
    }
}
