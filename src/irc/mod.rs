//! IRC protocol layer: line parsing, line framing, and the single outbound
//! session with its reader and writer tasks.

pub mod codec;
pub mod connection;
pub mod line;
