//! Vizion Resource Resolver
//!
//! Translates opaque storage identifiers (cover art, audio) into fetchable
//! URLs.
//!
//! # Features
//!
//! - **Pass-through**: identifiers outside the opaque scheme are returned unchanged
//! - **Deduplication**: concurrent lookups for one identifier share a single request
//! - **Caching**: successful resolutions are kept for the life of the process
//! - **Fallback**: failures are logged and replaced by a placeholder URL
//! - **Firebase Storage**: `FirebaseStorageService` resolves `gs://bucket/path` references
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vizion_resolver::{FirebaseStorageService, ResolverConfig, ResourceResolver, StorageServiceConfig};
//!
//! let storage = FirebaseStorageService::new(StorageServiceConfig::default())?;
//! let resolver = ResourceResolver::new(Arc::new(storage), ResolverConfig::default());
//!
//! let url = resolver.resolve("gs://vizion-gallery/songs/intro.mp3").await;
//! println!("Playing from {}", url);
//! ```

mod config;
mod error;
mod firebase;
mod resolver;

pub use config::{ResolverConfig, StorageServiceConfig};
pub use error::{ResolverError, Result};
pub use firebase::{FirebaseStorageService, StorageReference};
pub use resolver::ResourceResolver;
