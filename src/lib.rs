//! Library crate for the Record Label League server: season engine, storage,
//! services and HTTP routes, exposed for the binaries and tests.

pub mod config;
pub mod dao;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
