//! Build Error Taxonomy
//!
//! Every fatal condition aborts the whole build: a refused build beats a
//! broken site, so there is no degraded mode and no partial output. Each
//! message names the file, field, or rule violated and, where one exists,
//! the fix.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("source file missing: {}", .path.display())]
    SourceMissing { path: PathBuf },

    #[error("{}: JSON parse error: {source}", .file.display())]
    ParseFailure {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "{}: key \"{key}\" contains markup outside the <br>/<em>/<strong> allowlist: {value}",
        .file.display()
    )]
    SecurityViolation {
        file: PathBuf,
        key: String,
        value: String,
    },

    #[error(
        "{context}: referenced image does not exist: {} — add the image or remove the reference",
        .path.display()
    )]
    AssetMissing { context: String, path: PathBuf },

    #[error("{entity}: required field \"{field}\" is empty — fill it in, or pass --draft while editing")]
    DataIncomplete { entity: String, field: String },

    #[error("build guard: {artifact} is {actual_kb:.1} KB, expected at least {min_kb:.1} KB — possible empty-fragment bug in concat")]
    SizeGuard {
        artifact: String,
        actual_kb: f64,
        min_kb: f64,
    },

    #[error("build guard: font family \"{family}\" appears {count} times in the stylesheet (expected exactly 1)")]
    FontGuard { family: String, count: usize },

    #[error("manifest {}: {detail}", .path.display())]
    ManifestInvalid { path: PathBuf, detail: String },

    #[error("manifest requires engine >= {required}, current is {current}")]
    EngineVersionMismatch { required: String, current: String },

    #[error("failed to launch markup linter \"{command}\": {source}")]
    LintSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("markup lint failed with exit status {status}")]
    LintFailed { status: i32 },

    #[error("{count} architectural invariant(s) failed: {details}")]
    InvariantsFailed { count: usize, details: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
