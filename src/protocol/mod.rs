//! Wire protocol module.
//!
//! Defines request/response types and message framing for the greetd socket.
//!
//! ## Wire Format
//!
//! Messages are length-prefixed JSON:
//! ```text
//! [4 bytes: length (host-native u32)][JSON payload]
//! ```
//!
//! greetd only talks over a local socket, so the prefix uses the host byte
//! order rather than a fixed one.

mod request;
mod response;
mod wire;

pub use request::{Request, RequestType};
pub use response::{AuthMessageType, ErrorType, Response, ResponseType};
pub use wire::{
    decode_frame_header, decode_payload, encode, encode_frame_header, read_frame,
    read_frame_async, read_frame_async_with_timeout, write_frame, write_frame_async,
    write_frame_async_with_timeout, DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE,
};
