//! Command implementations for the flowrun CLI

pub mod flows;
pub mod serve;

pub use flows::{run_flow, run_list, run_show};
pub use serve::run_serve;
