//! Orderflow Core — shared domain types and abstractions.
//!
//! This crate defines the entities, wire messages, error type, and the
//! traits that every other crate depends on. It contains no infrastructure
//! code.

pub mod domain;
pub mod error;
pub mod message;
pub mod publisher;
pub mod repository;
pub mod user;
