//! CP12 Core - Trạm CP12 Site Compiler
//!
//! # The Five Laws (Non-Negotiable)
//! 1. The Manifest Is Truth
//! 2. Order Is The Rendering Model
//! 3. Guards Are Protective
//! 4. Deterministic Output
//! 5. Injected Data Is Escaped

pub mod content;
pub mod error;
pub mod guards;
pub mod hashing;
pub mod invariants;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod schema;
pub mod seed;

pub use content::{Catalog, MetaItem, Photo, Room, SiteData, StringTable};
pub use error::BuildError;
pub use hashing::{artifact_digest, canonical_json, content_digest};
pub use invariants::{InvariantRule, InvariantValidator, SiteSnapshot};
pub use manifest::{HtmlPiece, SiteManifest};
pub use pipeline::{AssembledSite, BuildPipeline, BuildReport};
pub use report::{CheckItem, CheckReport};
pub use schema::SchemaSuite;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_MANIFEST_VERSION: &str = "1.0.0";
