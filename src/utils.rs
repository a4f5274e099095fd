use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use sha2::{Digest, Sha256};

use crate::error::{ReformatError, Result};

/// Decoded file content along with what is needed to write it back safely.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub text: String,
    pub encoding: &'static Encoding,
    /// SHA-256 of the raw bytes at read time, hex encoded.
    pub digest: String,
}

/// Reads a file as text. Invalid UTF-8 falls back to Windows-1252, which
/// maps every byte and can be encoded back without loss.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|source| ReformatError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let digest = digest_bytes(&bytes);
    let (text, encoding) = match String::from_utf8(bytes) {
        Ok(s) => (s, UTF_8),
        Err(err) => {
            let (res, _) = WINDOWS_1252.decode_without_bom_handling(err.as_bytes());
            (res.into_owned(), WINDOWS_1252)
        }
    };

    Ok(SourceFile {
        text,
        encoding,
        digest,
    })
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Splits text into lines, each keeping its terminator.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Separates a line from its `\n` or `\r\n` terminator.
pub fn split_newline(s: &str) -> (&str, &str) {
    if let Some(stripped) = s.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = s.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (s, "")
    }
}

pub fn encode_lines(lines: &[String], encoding: &'static Encoding) -> Vec<u8> {
    let joined = lines.concat();
    if encoding == UTF_8 {
        return joined.into_bytes();
    }
    let (bytes, _, _) = encoding.encode(&joined);
    bytes.into_owned()
}
