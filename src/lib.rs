//! Skip Trace API Library
//!
//! This library provides the core functionality for the skip-trace lookup
//! service: a persistent fingerprint cache in front of a paid upstream
//! identity provider, plus the normalization pipeline that converts the
//! provider's loose payloads into a fixed internal schema.
//!
//! # Modules
//!
//! - `cache_storage`: Expiring key-value store backed by SQLite.
//! - `confidence`: Match-confidence scoring.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `errors`: Error handling types.
//! - `fingerprint`: Deterministic cache-key derivation.
//! - `gateway_client`: Upstream provider client.
//! - `handlers`: HTTP request handlers.
//! - `integrity`: Cache-entry integrity checksums.
//! - `lookup`: Lookup workflow service.
//! - `models`: Query and normalized-identity models.
//! - `normalizer`: Raw payload normalization.

pub mod cache_storage;
pub mod confidence;
pub mod config;
pub mod db;
pub mod errors;
pub mod fingerprint;
pub mod gateway_client;
pub mod handlers;
pub mod integrity;
pub mod lookup;
pub mod models;
pub mod normalizer;
