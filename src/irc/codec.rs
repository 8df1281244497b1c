//! Line codec shared by the IRC session and the TCP log listener.
//!
//! Frames a byte stream on `\n` (an optional preceding `\r` is stripped),
//! decodes each line as lossy UTF-8, and enforces an explicit maximum line
//! length. Outgoing lines are terminated with `\r\n`.

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

#[derive(Debug, Error)]
pub enum LineCodecError {
    #[error("line exceeds maximum length ({limit} bytes)")]
    LineTooLong { limit: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct LineCodec {
    max_length: usize,
    /// Bytes already scanned for a newline in the current buffer.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }

    fn finish_line(&self, raw: &[u8]) -> Result<String, LineCodecError> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.len() > self.max_length {
            return Err(LineCodecError::LineTooLong {
                limit: self.max_length,
            });
        }
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LineCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let start = self.next_index.min(src.len());
        match src[start..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = start + offset;
                self.next_index = 0;
                let frame = src.split_to(end + 1);
                self.finish_line(&frame[..end]).map(Some)
            }
            None => {
                // Allow one extra byte for a `\r` that may still be followed by `\n`
                if src.len() > self.max_length + 1 {
                    return Err(LineCodecError::LineTooLong {
                        limit: self.max_length,
                    });
                }
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        self.next_index = 0;
        let frame = src.split_to(src.len());
        self.finish_line(&frame).map(Some)
    }
}

impl Encoder<String> for LineCodec {
    type Error = LineCodecError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_crlf_and_lf() {
        let mut codec = LineCodec::new(512);
        let mut buf = BytesMut::from(&b"PING :a\r\nPING :b\nPART"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :a"));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :b"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(&buf[..], b"PART");
    }

    #[test]
    fn test_decode_across_reads() {
        let mut codec = LineCodec::new(512);
        let mut buf = BytesMut::from(&b"hello "[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"world\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("hello world"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_eof_yields_unterminated_tail() {
        let mut codec = LineCodec::new(512);
        let mut buf = BytesMut::from(&b"last line"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().as_deref(), Some("last line"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_line_too_long() {
        let mut codec = LineCodec::new(8);
        let mut buf = BytesMut::from(&b"0123456789abcdef"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(LineCodecError::LineTooLong { limit: 8 })
        ));

        let mut codec = LineCodec::new(8);
        let mut buf = BytesMut::from(&b"123456789\n"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(LineCodecError::LineTooLong { .. })
        ));

        let mut codec = LineCodec::new(8);
        let mut buf = BytesMut::from(&b"12345678\r\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("12345678"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new(512);
        let mut buf = BytesMut::from(&b"caf\xe9\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new(512);
        let mut buf = BytesMut::new();
        codec.encode("NICK logbot".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"NICK logbot\r\n");
    }
}
