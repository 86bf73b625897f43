//! Feature adapters: eligible citations in, model-specific batches out.
//! Both adapters keep input order; row `i` of every column is citation `i`.

pub mod cnn;
pub mod voting;
