//! Outer surfaces: the console renderer and the BPEL document export.

pub mod bpel;
pub mod console;
