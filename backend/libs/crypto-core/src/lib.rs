//! Token primitives shared by community services.
pub mod jwt;
