//! Transport helpers.
//!
//! Commands travel as text, one command per line with whitespace-separated
//! integers. Messages to and from a judge are framed with a 4-byte
//! big-endian length prefix.

use std::io::{self, Read, Write};

/// Largest payload accepted by [`read_frame`].
pub const MAX_FRAME_LEN: usize = 1 << 20;

/// Transport failures.
#[derive(Debug)]
pub enum ProtocolError {
    /// A command line holds something other than integers.
    BadToken {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// Frame length exceeds [`MAX_FRAME_LEN`].
    FrameTooLarge(usize),
    /// Stream ended inside a frame.
    Truncated,
    /// Underlying I/O failure.
    Io(io::Error),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadToken { line, token } => {
                write!(f, "line {line}: expected integer, got {token:?}")
            }
            Self::FrameTooLarge(len) => {
                write!(f, "frame of {len} bytes exceeds limit of {MAX_FRAME_LEN}")
            }
            Self::Truncated => write!(f, "stream ended inside a frame"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(e)
        }
    }
}

/// Parse command text into integer vectors.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`ProtocolError::BadToken`] for any token that is not an integer.
pub fn parse_commands(text: &str) -> Result<Vec<Vec<i64>>, ProtocolError> {
    let mut commands = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| ProtocolError::BadToken {
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        commands.push(command);
    }
    Ok(commands)
}

/// Render command vectors in the form [`parse_commands`] reads.
#[must_use]
pub fn format_commands(commands: &[Vec<i64>]) -> String {
    let mut out = String::new();
    for command in commands {
        let line: Vec<String> = command.iter().map(i64::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Write one length-prefixed frame.
///
/// # Errors
///
/// Fails when the payload is too large or the writer fails.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge(payload.len()))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed frame. `None` on a clean end of stream.
///
/// # Errors
///
/// Fails on an oversized length, a stream that ends mid-frame, or I/O errors.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(ProtocolError::Truncated),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        let text = "# opening\n1 3 4 2 5\n\n  8  \n6 3 1 2 -1 -1\n";
        let commands = parse_commands(text).unwrap();
        assert_eq!(commands, vec![vec![1, 3, 4, 2, 5], vec![8], vec![6, 3, 1, 2, -1, -1]]);
    }

    #[test]
    fn test_parse_commands_bad_token() {
        let err = parse_commands("1 2 3\n4 x 5\n").unwrap_err();
        match err {
            ProtocolError::BadToken { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_format_commands_is_parseable() {
        let commands = vec![vec![1, 0, 0, 4, 3], vec![8]];
        let text = format_commands(&commands);
        assert_eq!(text, "1 0 0 4 3\n8\n");
        assert_eq!(parse_commands(&text).unwrap(), commands);
    }

    #[test]
    fn test_frames() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"hello").unwrap();
        write_frame(&mut buf, b"").unwrap();
        assert_eq!(&buf[..4], &[0, 0, 0, 5]);

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_frame(&mut cursor).unwrap(), Some(b"hello".to_vec()));
        assert_eq!(read_frame(&mut cursor).unwrap(), Some(Vec::new()));
        assert_eq!(read_frame(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_truncated_frame() {
        let mut cursor = Cursor::new(vec![0, 0, 0, 9, 1, 2]);
        assert!(matches!(read_frame(&mut cursor), Err(ProtocolError::Truncated)));
        let mut cursor = Cursor::new(vec![0, 0]);
        assert!(matches!(read_frame(&mut cursor), Err(ProtocolError::Truncated)));
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut cursor = Cursor::new(vec![0xff, 0xff, 0xff, 0xff]);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(ProtocolError::FrameTooLarge(_))
        ));
    }
}
