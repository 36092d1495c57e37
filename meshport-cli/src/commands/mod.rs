//! CLI command implementations.

pub mod port;

pub use port::port_corpus;
