//! Port traits the pipeline and CLI are written against.

pub mod config_port;
pub mod price_source;
