//! Async client on tokio.

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, info};

use crate::audit::sanitize_request;
use crate::auth::verify_peer;
use crate::config::Settings;
use crate::error::IpcResult;
use crate::protocol::{
    decode_payload, encode, read_frame_async, read_frame_async_with_timeout, write_frame_async,
    write_frame_async_with_timeout, Request, Response, DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE,
};

use super::socket_path_from_env;

/// A greetd IPC client for use inside a tokio runtime.
///
/// Same exchange as [`Client`](super::Client): one request, then exactly one
/// response, with no pipelining.
#[derive(Debug)]
pub struct AsyncClient<S = UnixStream> {
    stream: S,
    max_message_size: usize,
    timeout: Option<Duration>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> AsyncClient<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            timeout: None,
        }
    }

    /// Limit the size of response frames this client accepts.
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Apply a deadline to each write and each read.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a request to greetd and return its response.
    ///
    /// See [`Client::send`](super::Client::send) for which failures are errors.
    pub async fn send(&mut self, request: &Request) -> IpcResult<Response> {
        let frame = encode(request)?;
        debug!(
            request_type = %request.kind(),
            request = %sanitize_request(request),
            len = frame.len() - HEADER_SIZE,
            "Sending request"
        );

        let payload = match self.timeout {
            Some(timeout) => {
                write_frame_async_with_timeout(&mut self.stream, &frame, timeout).await?;
                read_frame_async_with_timeout(&mut self.stream, self.max_message_size, timeout)
                    .await?
            }
            None => {
                write_frame_async(&mut self.stream, &frame).await?;
                read_frame_async(&mut self.stream, self.max_message_size).await?
            }
        };

        let response = decode_payload(&payload)?;
        debug!(response_type = %response.kind(), len = payload.len(), "Received response");

        Ok(response)
    }

    /// Shut down the write side and release the stream.
    pub async fn close(mut self) -> IpcResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl AsyncClient<UnixStream> {
    /// Connect to the greetd socket at `path`.
    pub async fn connect<P: AsRef<Path>>(path: P) -> IpcResult<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).await?;
        info!(socket = %path.display(), "Connected to greetd");
        Ok(Self::new(stream))
    }

    /// Connect to the socket named by `$GREETD_SOCK`.
    pub async fn connect_env() -> IpcResult<Self> {
        Self::connect(socket_path_from_env()?).await
    }

    /// Connect using the socket, limits and peer checks from `settings`.
    pub async fn connect_with(settings: &Settings) -> IpcResult<Self> {
        let client = Self::connect(settings.socket_path()?)
            .await?
            .with_max_message_size(settings.limits.max_message_size)
            .with_timeout(settings.socket_timeout());

        if !settings.security.allowed_peer_uids.is_empty() {
            let peer = verify_peer(&client.stream, &settings.security.allowed_peer_uids)?;
            debug!(uid = peer.uid, gid = peer.gid, pid = peer.pid, "Peer verified");
        }

        Ok(client)
    }
}
