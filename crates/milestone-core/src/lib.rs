//! Core types and service functions for the Milestone shared-album viewer.
//!
//! This crate is free of HTTP dependencies. The backend-as-a-service is
//! reached only through the [`backend::AlbumBackend`] trait; the PostgREST
//! implementation lives in `milestone-supabase` and an in-memory one in
//! [`memory`].

// We intentionally use native `async fn` in traits.
#![allow(async_fn_in_trait)]

pub mod album;
pub mod asset;
pub mod backend;
pub mod error;
pub mod memory;
pub mod policy;
pub mod service;
pub mod views;

pub use error::{Error, Result};
