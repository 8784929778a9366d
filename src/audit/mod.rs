//! Log hygiene for requests.

mod sanitize;

pub use sanitize::sanitize_request;
