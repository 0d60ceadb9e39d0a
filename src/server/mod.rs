//! Transport frontends that feed request envelopes to the dispatcher.

pub mod http;
pub mod stdio;

pub use http::start_http_server;
pub use stdio::{run_stdio, serve_lines};
