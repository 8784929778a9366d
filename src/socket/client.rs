//! Blocking client.

use std::io::{self, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::{debug, info};

use crate::audit::sanitize_request;
use crate::auth::verify_peer;
use crate::config::Settings;
use crate::error::{IpcError, IpcResult};
use crate::protocol::{
    decode_payload, encode, read_frame, write_frame, Request, Response,
    DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE,
};
use crate::session::Exchange;

use super::socket_path_from_env;

/// A greetd IPC client over a blocking stream.
///
/// The protocol is strictly half-duplex: [`send`](Client::send) writes one
/// request and blocks until its response has been read. `&mut self` keeps a
/// single request in flight; a client shared between threads must be wrapped
/// in a `Mutex` held across each call.
#[derive(Debug)]
pub struct Client<S = UnixStream> {
    stream: S,
    max_message_size: usize,
}

impl<S: Read + Write> Client<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Limit the size of response frames this client accepts.
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Send a request to greetd and return its response.
    ///
    /// An error is returned only if the frame could not be written, read,
    /// encoded or decoded. A response of type `error` (for instance a failed
    /// authentication) is a normal return value that the caller must inspect.
    pub fn send(&mut self, request: &Request) -> IpcResult<Response> {
        let frame = encode(request)?;
        debug!(
            request_type = %request.kind(),
            request = %sanitize_request(request),
            len = frame.len() - HEADER_SIZE,
            "Sending request"
        );
        write_frame(&mut self.stream, &frame)?;

        let payload = read_frame(&mut self.stream, self.max_message_size)?;
        let response = decode_payload(&payload)?;
        debug!(response_type = %response.kind(), len = payload.len(), "Received response");

        Ok(response)
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl Client<UnixStream> {
    /// Connect to the greetd socket at `path`.
    pub fn connect<P: AsRef<Path>>(path: P) -> IpcResult<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path)?;
        info!(socket = %path.display(), "Connected to greetd");
        Ok(Self::new(stream))
    }

    /// Connect to the socket named by `$GREETD_SOCK`.
    pub fn connect_env() -> IpcResult<Self> {
        Self::connect(socket_path_from_env()?)
    }

    /// Connect using the socket, limits and peer checks from `settings`.
    pub fn connect_with(settings: &Settings) -> IpcResult<Self> {
        let client = Self::connect(settings.socket_path()?)?
            .with_max_message_size(settings.limits.max_message_size);

        if let Some(timeout) = settings.socket_timeout() {
            client.stream.set_read_timeout(Some(timeout))?;
            client.stream.set_write_timeout(Some(timeout))?;
        }

        if !settings.security.allowed_peer_uids.is_empty() {
            let peer = verify_peer(&client.stream, &settings.security.allowed_peer_uids)?;
            debug!(uid = peer.uid, gid = peer.gid, pid = peer.pid, "Peer verified");
        }

        Ok(client)
    }

    /// Close the connection. From greetd's point of view this ends any
    /// session still being configured.
    pub fn close(self) -> IpcResult<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(IpcError::Io(e)),
            _ => Ok(()),
        }
    }
}

impl<S: Read + Write> Exchange for Client<S> {
    fn exchange(&mut self, request: &Request) -> IpcResult<Response> {
        self.send(request)
    }
}

/// Raw access to the stream, bypassing framing.
impl<S: Read> Read for Client<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl<S: Write> Write for Client<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}
