//! Domain model of the order process: the order and its scenarios, the
//! results returned by the partner services, the step board, the timeline
//! and the ports the runner talks through.

pub mod order;
pub mod ports;
pub mod process;
pub mod service;
pub mod speed;
pub mod step;
