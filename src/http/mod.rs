//! One HTTP(S) request/response cycle per call, classified into an outcome.
mod executor;
mod headers;

#[cfg(test)]
pub(crate) mod stub;
#[cfg(test)]
mod tests;

pub use executor::{RequestExecutor, RequestSender};
pub use headers::build_header_map;
