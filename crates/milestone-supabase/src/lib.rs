//! PostgREST backend for the Milestone album viewer.
//!
//! Talks to a Supabase project's REST endpoint with the public (anonymous)
//! API key. No session is ever established: every request carries the key and
//! nothing else.

mod filter;
mod client;

pub mod error;

pub use client::{SupabaseClient, SupabaseConfig};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
