//! Web module for the HTTP server and SSE stream responses

pub mod server;
pub mod stream;

pub use server::WebServer;
