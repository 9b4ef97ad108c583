//! Command-line entry points and tracing setup for the kbbq binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod observability;
