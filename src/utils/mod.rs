//! Process bootstrap helpers.
//!
//! Logging and meter provider setup shared by binaries embedding the
//! metrics providers.

pub mod bootstrap;
