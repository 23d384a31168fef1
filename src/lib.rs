//! TenderChain evaluation API library
//!
//! This library provides the HTTP surface of the TenderChain evaluation
//! service: configuration, request/response models, the scorer abstraction
//! and its remote implementation, and the axum router.
//!
//! # Modules
//!
//! - `api`: API-layer namespace (handlers, routes).
//! - `core`: Domain namespace (models, scoring, errors).
//! - `integrations`: External service integrations.
//! - `circuit_breaker`: Circuit breaker for scoring calls.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request and response models.
//! - `routes`: Router and CORS construction.
//! - `scoring`: Scorer trait and remote scoring client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod circuit_breaker;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scoring;
