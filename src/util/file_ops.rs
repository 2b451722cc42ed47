// File Operations for RSA Encryption/Decryption
// Whole-file reads and writes with the offending path attached to errors

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{RsaError, RsaResult};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RsaError + '_ {
    move |source| RsaError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> RsaResult<Vec<u8>> {
    let mut file = File::open(path).map_err(io_error(path))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(io_error(path))?;
    Ok(data)
}

/// Read entire file as UTF-8 text
pub fn read_text(path: &Path) -> RsaResult<String> {
    let data = read_file(path)?;
    String::from_utf8(data).map_err(|e| RsaError::InvalidUtf8 {
        index: 0,
        source: e.utf8_error(),
    })
}

/// Write data to file, replacing previous contents
pub fn write_file(path: &Path, data: &[u8]) -> RsaResult<()> {
    let mut file = File::create(path).map_err(io_error(path))?;
    file.write_all(data).map_err(io_error(path))?;
    file.flush().map_err(io_error(path))?;
    Ok(())
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
