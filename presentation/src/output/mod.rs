//! Console output

pub mod status;
