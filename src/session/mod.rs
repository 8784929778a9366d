//! Login session flow.
//!
//! greetd expects a greeter to walk one session through
//! `create_session`, any number of auth message answers, and finally
//! `start_session` or `cancel_session`. [`SessionState`] encodes which request
//! may follow which response; [`LoginSession`] drives a client through that
//! table and refuses requests that would break it.

mod flow;
mod state;

pub use flow::{Exchange, LoginSession};
pub use state::SessionState;
