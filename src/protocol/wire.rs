//! Wire format for message framing.
//!
//! Messages are length-prefixed: [4 bytes host-native u32][JSON payload]

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::trace;

use super::{Request, Response};
use crate::error::{
    DeserializationErrorKind, IpcError, IpcResult, ProtocolErrorKind, TransportErrorKind,
};

/// Size of the length prefix.
pub const HEADER_SIZE: usize = 4;

/// Maximum response size accepted by default (1 MB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1_048_576;

/// Encode a payload length as a frame header.
pub fn encode_frame_header(len: u32) -> [u8; HEADER_SIZE] {
    len.to_ne_bytes()
}

/// Decode a frame header into the payload length.
///
/// There is no magic or version field: the value is trusted as long as both
/// sides stay in lockstep.
pub fn decode_frame_header(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_ne_bytes(header)
}

/// Serialize a request into a complete frame (header and JSON payload).
pub fn encode(request: &Request) -> IpcResult<Vec<u8>> {
    let payload = serde_json::to_vec(request).map_err(IpcError::Serialization)?;
    let len = u32::try_from(payload.len()).map_err(|_| IpcError::Protocol {
        kind: ProtocolErrorKind::MessageTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        },
    })?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&encode_frame_header(len));
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Parse a JSON payload into a response.
///
/// An empty payload is never a valid message.
pub fn decode_payload(payload: &[u8]) -> IpcResult<Response> {
    if payload.is_empty() {
        return Err(IpcError::Deserialization {
            kind: DeserializationErrorKind::EmptyPayload,
        });
    }

    serde_json::from_slice(payload).map_err(|e| IpcError::Deserialization {
        kind: DeserializationErrorKind::InvalidJson(e),
    })
}

fn check_size(len: usize, max_size: usize) -> IpcResult<()> {
    if len > max_size {
        return Err(IpcError::Protocol {
            kind: ProtocolErrorKind::MessageTooLarge {
                size: len,
                max: max_size,
            },
        });
    }
    Ok(())
}

fn map_io(e: std::io::Error) -> IpcError {
    match e.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => IpcError::Transport {
            kind: TransportErrorKind::Timeout,
        },
        _ => IpcError::Io(e),
    }
}

/// Fill `buf` completely, failing if the stream ends first.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> IpcResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(IpcError::Transport {
                    kind: TransportErrorKind::ConnectionClosed {
                        expected: buf.len(),
                        received: filled,
                    },
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(map_io(e)),
        }
    }
    Ok(())
}

/// Read a length-prefixed message from the reader.
///
/// Returns the raw bytes of the message payload. Blocks until the whole frame
/// has arrived, however it is fragmented.
pub fn read_frame<R: Read>(reader: &mut R, max_size: usize) -> IpcResult<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    read_full(reader, &mut header)?;

    let len = decode_frame_header(header) as usize;
    check_size(len, max_size)?;
    trace!(len, "Reading frame payload");

    let mut buf = vec![0u8; len];
    read_full(reader, &mut buf)?;
    Ok(buf)
}

/// Write a complete frame to the writer and flush it.
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> IpcResult<()> {
    writer.write_all(frame).map_err(map_io)?;
    writer.flush().map_err(map_io)?;
    Ok(())
}

async fn read_full_async<R>(reader: &mut R, buf: &mut [u8]) -> IpcResult<()>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => {
                return Err(IpcError::Transport {
                    kind: TransportErrorKind::ConnectionClosed {
                        expected: buf.len(),
                        received: filled,
                    },
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(map_io(e)),
        }
    }
    Ok(())
}

/// Async counterpart of [`read_frame`].
pub async fn read_frame_async<R>(reader: &mut R, max_size: usize) -> IpcResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_SIZE];
    read_full_async(reader, &mut header).await?;

    let len = decode_frame_header(header) as usize;
    check_size(len, max_size)?;
    trace!(len, "Reading frame payload");

    let mut buf = vec![0u8; len];
    read_full_async(reader, &mut buf).await?;
    Ok(buf)
}

/// Async counterpart of [`write_frame`].
pub async fn write_frame_async<W>(writer: &mut W, frame: &[u8]) -> IpcResult<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await.map_err(map_io)?;
    writer.flush().await.map_err(map_io)?;
    Ok(())
}

/// Read a length-prefixed message with a timeout.
///
/// Returns a Timeout error if the read takes longer than the specified duration.
pub async fn read_frame_async_with_timeout<R>(
    reader: &mut R,
    max_size: usize,
    timeout_duration: Duration,
) -> IpcResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    timeout(timeout_duration, read_frame_async(reader, max_size))
        .await
        .map_err(|_| IpcError::Transport {
            kind: TransportErrorKind::Timeout,
        })?
}

/// Write a frame with a timeout.
///
/// Returns a Timeout error if the write takes longer than the specified duration.
pub async fn write_frame_async_with_timeout<W>(
    writer: &mut W,
    frame: &[u8],
    timeout_duration: Duration,
) -> IpcResult<()>
where
    W: AsyncWrite + Unpin,
{
    timeout(timeout_duration, write_frame_async(writer, frame))
        .await
        .map_err(|_| IpcError::Transport {
            kind: TransportErrorKind::Timeout,
        })?
}
