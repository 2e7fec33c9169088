//! # OSGraph HTTP Bridge
//!
//! Implements [`osgraph_app::QueryServiceBridge`] against the OSGraph
//! analytics REST API:
//!
//! | operation | endpoint |
//! |-----------|----------|
//! | template catalog | `GET /api/graph/template/list` |
//! | full-text search | `POST /api/graph/fulltext` |
//! | template execution | `POST /api/graph/template/execute` |
//!
//! Paths, timeout and bearer token come from [`HttpBridgeConfig`].

pub mod client;
pub mod config;
pub mod wire;

pub use client::HttpQueryService;
pub use config::{EndpointPaths, HttpBridgeConfig};
