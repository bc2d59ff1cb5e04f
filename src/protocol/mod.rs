//! Protocol Module
//!
//! Defines the wire framing for world topic queries.
//!
//! ## Request Format
//! ```text
//! ┌──────┬──────┬───────────┬──────────────┬──────┬─────────────────┐
//! │ 0x00 │ 0x83 │ Len (2)   │ 0x00 x 5     │ '?'  │  Query          │
//! └──────┴──────┴───────────┴──────────────┴──────┴─────────────────┘
//! ```
//! `Len` is big-endian and equals `len(query) + 7`.
//!
//! ## Response Format
//! ```text
//! ┌──────┬──────┬───────────┬──────┬──────────────────────┐
//! │ 0x00 │ 0x83 │ L (2)     │ 0x06 │  Body (L - 1)        │
//! └──────┴──────┴───────────┴──────┴──────────────────────┘
//! ```
//! The payload handed to the caller is the body minus its final byte.

mod codec;

pub use codec::{
    check_query_size, decode_response, encode_request, parse_response_header, read_response, write_request,
    MAX_QUERY_SIZE, REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE,
};
