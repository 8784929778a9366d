//! Peer credential verification using SO_PEERCRED.
//!
//! Lets a greeter check that the process behind the socket runs as an
//! expected UID (normally root) before sending credentials to it.

use crate::error::{AuthErrorKind, IpcError, IpcResult};

/// Information about the connected peer.
#[derive(Debug, Clone)]
pub struct PeerInfo {
    /// User ID of the peer process.
    pub uid: u32,
    /// Group ID of the peer process.
    pub gid: u32,
    /// Process ID of the peer process.
    pub pid: i32,
}

/// Read the credentials of the process on the other end of `stream`.
#[cfg(target_os = "linux")]
pub fn peer_info<S: std::os::fd::AsFd>(stream: &S) -> IpcResult<PeerInfo> {
    use nix::sys::socket::{getsockopt, sockopt::PeerCredentials};

    let creds = getsockopt(stream, PeerCredentials).map_err(|e| IpcError::Auth {
        kind: AuthErrorKind::PeerCredentials {
            message: e.to_string(),
        },
    })?;

    Ok(PeerInfo {
        uid: creds.uid(),
        gid: creds.gid(),
        pid: creds.pid(),
    })
}

#[cfg(not(target_os = "linux"))]
pub fn peer_info<S: std::os::fd::AsFd>(_stream: &S) -> IpcResult<PeerInfo> {
    Err(IpcError::Auth {
        kind: AuthErrorKind::PeerCredentials {
            message: "SO_PEERCRED is not available on this platform".to_string(),
        },
    })
}

/// Verify that the peer runs as one of `allowed_uids`.
///
/// An empty list rejects every peer.
pub fn verify_peer<S: std::os::fd::AsFd>(stream: &S, allowed_uids: &[u32]) -> IpcResult<PeerInfo> {
    let peer = peer_info(stream)?;

    if !allowed_uids.contains(&peer.uid) {
        return Err(IpcError::Auth {
            kind: AuthErrorKind::UnauthorizedPeer { uid: peer.uid },
        });
    }

    Ok(peer)
}
