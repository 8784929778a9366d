//! Peer authentication module.
//!
//! Checks who is listening on the greetd socket.

mod peer_creds;

pub use peer_creds::{peer_info, verify_peer, PeerInfo};
