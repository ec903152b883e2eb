//! Adapters behind the domain ports: simulated partner services and an
//! in-memory observer.

pub mod in_memory;
pub mod simulated;
