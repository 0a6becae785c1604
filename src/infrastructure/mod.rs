//! Adapters behind the domain ports: an in-memory page and relay, and a
//! sandbox payment provider.

pub mod in_memory;
pub mod sandbox;
