//! Proof module: canonical JSON and domain-separated content hashing.
//!
//! Search results are only worth recording if two runs of the same problem
//! produce the same bytes. Everything that ends up in an artifact routes
//! through this module.

pub mod canon;
pub mod hash;
pub mod hash_domain;
