use crate::error::{Error, Result};
use bytes::Bytes;
use encoding_rs::SHIFT_JIS;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::Read;

pub const ENC_IDENTITY: &str = "identity";
pub const ENC_GZIP: &str = "gzip";
pub const ENC_DEFLATE: &str = "deflate";
pub const ENC_ZSTD: &str = "zstd";

fn decode_gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    GzDecoder::new(data).read_to_end(&mut decoded)?;
    Ok(decoded)
}

fn decode_deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    DeflateDecoder::new(data).read_to_end(&mut decoded)?;
    Ok(decoded)
}

/// Undo the response's `Content-Encoding`. Unknown encodings pass through untouched.
pub fn decompress(data: Bytes, encoding: Option<&str>) -> Result<Bytes> {
    let encoding = match encoding {
        Some(e) => e.trim().to_ascii_lowercase(),
        None => return Ok(data),
    };

    let decoded = match encoding.as_str() {
        ENC_GZIP => decode_gzip(&data),
        ENC_DEFLATE => decode_deflate(&data),
        ENC_ZSTD => zstd::decode_all(&data[..]),
        _ => return Ok(data),
    };

    decoded
        .map(Bytes::from)
        .map_err(|source| Error::Decode { encoding, source })
}

/// Decode a text body as UTF-8, falling back to Shift_JIS.
pub fn decode_text(data: &[u8]) -> Result<String> {
    match std::str::from_utf8(data) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(data);
            if had_errors {
                return Err(Error::UndecodableText);
            }
            Ok(text.into_owned())
        }
    }
}
