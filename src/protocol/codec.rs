//! Protocol codec
//!
//! Encoding and decoding functions for topic frames, plus stream helpers
//! that move exactly one frame over a `Read`/`Write`.

use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, QueryError, Result};

/// Frame start marker shared by requests and responses
const FRAME_START: [u8; 2] = [0x00, 0x83];

/// Request type byte
const QUERY_MARKER: u8 = b'?';

/// Response type byte
const RESPONSE_MARKER: u8 = 0x06;

/// Request header: marker (2) + length (2) + padding (5) + '?' (1)
pub const REQUEST_HEADER_SIZE: usize = 10;

/// Response header: marker (2) + length (2) + type (1)
pub const RESPONSE_HEADER_SIZE: usize = 5;

/// Bytes after the length field that the request length also counts
const REQUEST_LENGTH_OVERHEAD: usize = 7;

/// Largest query whose length still fits the 16-bit length field
pub const MAX_QUERY_SIZE: usize = u16::MAX as usize - REQUEST_LENGTH_OVERHEAD;

// =============================================================================
// Request Encoding
// =============================================================================

/// Reject queries whose length cannot be expressed in the length field
pub fn check_query_size(query: &[u8]) -> Result<()> {
    if query.len() > MAX_QUERY_SIZE {
        return Err(ProtocolError::QueryTooLarge {
            size: query.len(),
            max: MAX_QUERY_SIZE,
        }
        .into());
    }
    Ok(())
}

/// Encode a query into a request frame
///
/// Format: 0x00 0x83 + len (2, BE) + 5 x 0x00 + '?' + query + 0x00
pub fn encode_request(query: &[u8]) -> Result<Bytes> {
    check_query_size(query)?;

    let mut frame = BytesMut::with_capacity(REQUEST_HEADER_SIZE + query.len() + 1);
    frame.put_slice(&FRAME_START);
    frame.put_u16((query.len() + REQUEST_LENGTH_OVERHEAD) as u16);
    frame.put_bytes(0x00, 5);
    frame.put_u8(QUERY_MARKER);
    frame.put_slice(query);
    // trailing terminator, counted by the length field
    frame.put_u8(0x00);

    Ok(frame.freeze())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Validate a response header and return the body length (`L - 1`)
pub fn parse_response_header(header: &[u8; RESPONSE_HEADER_SIZE]) -> Result<usize> {
    let expected = [(0, FRAME_START[0]), (1, FRAME_START[1]), (4, RESPONSE_MARKER)];
    for (offset, byte) in expected {
        if header[offset] != byte {
            return Err(ProtocolError::BadMarker {
                offset,
                expected: byte,
                found: header[offset],
            }
            .into());
        }
    }

    let declared = u16::from_be_bytes([header[2], header[3]]);
    if declared < 2 {
        return Err(ProtocolError::InvalidLength(declared).into());
    }

    Ok(declared as usize - 1)
}

/// Decode a fully buffered response frame into its payload
///
/// `bytes` must hold exactly one frame; missing bytes are `Truncated`,
/// surplus bytes are a `LengthMismatch`.
pub fn decode_response(bytes: &[u8]) -> Result<Bytes> {
    let Some(header) = bytes.first_chunk::<RESPONSE_HEADER_SIZE>() else {
        return Err(ProtocolError::Truncated {
            expected: RESPONSE_HEADER_SIZE,
            received: bytes.len(),
        }
        .into());
    };

    let body_len = parse_response_header(header)?;
    let body = &bytes[RESPONSE_HEADER_SIZE..];

    if body.len() < body_len {
        return Err(ProtocolError::Truncated {
            expected: body_len,
            received: body.len(),
        }
        .into());
    }
    if body.len() > body_len {
        return Err(ProtocolError::LengthMismatch {
            declared: body_len,
            actual: body.len(),
        }
        .into());
    }

    Ok(Bytes::copy_from_slice(&body[..body_len - 1]))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request frame for `query` to a stream
pub fn write_request<W: Write>(writer: &mut W, query: &[u8]) -> Result<usize> {
    let frame = encode_request(query)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(frame.len())
}

/// Read exactly one response frame from a stream and return its payload
///
/// Short reads are retried until the header and body are complete; the
/// stream closing first is a `Truncated` protocol error.
pub fn read_response<R: Read>(reader: &mut R) -> Result<Bytes> {
    let mut header = [0u8; RESPONSE_HEADER_SIZE];
    read_full(reader, &mut header)?;

    let body_len = parse_response_header(&header)?;

    let mut body = BytesMut::zeroed(body_len);
    read_full(reader, &mut body)?;

    // drop the trailing byte
    body.truncate(body_len - 1);
    Ok(body.freeze())
}

/// Fill `buf` completely, looping over partial reads
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ProtocolError::Truncated {
                    expected: buf.len(),
                    received: filled,
                }
                .into())
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(QueryError::Io(e)),
        }
    }
    Ok(())
}
