//! Build Pipeline - Single Entry Point
//!
//! CRITICAL: build MUST run every guard and the post-write validator
//! internally. No bypass.
//!
//! The whole run is synchronous and sequential: read fragments, join in
//! manifest order, guard, write, lint, validate. A failing run aborts
//! before its write phase, so artifacts from an earlier successful build
//! stay on disk untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

use crate::content::{self, SiteData};
use crate::error::BuildError;
use crate::guards;
use crate::hashing::{artifact_digest, content_digest};
use crate::invariants::InvariantValidator;
use crate::manifest::{HtmlPiece, SiteManifest};
use crate::{ENGINE_VERSION, MIN_MANIFEST_VERSION};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static GUARD_SUITE_RUNS: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_guard_suite_runs() -> u32 {
    GUARD_SUITE_RUNS.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_guard_suite_runs() {
    GUARD_SUITE_RUNS.store(0, Ordering::SeqCst)
}

/// Element ids of the inline data blocks the document embeds. The
/// client-side runtime looks these up by id at page load.
pub const ROOMS_DATA_ID: &str = "rooms-data";
pub const LANG_VI_DATA_ID: &str = "lang-vi-data";
pub const LANG_EN_DATA_ID: &str = "lang-en-data";

/// The three assembled artifacts, in memory, before any write.
#[derive(Debug, Clone)]
pub struct AssembledSite {
    pub document: String,
    pub stylesheet: String,
    pub script: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub name: String,
    pub path: PathBuf,
    pub lines: usize,
    pub kilobytes: f64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub build_id: String,
    pub engine_version: String,
    pub manifest_version: String,
    pub draft: bool,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub catalog_digest: String,
    pub artifacts: Vec<ArtifactReport>,
    pub invariants_checked: usize,
}

/// The build pipeline - single entry point for assembling the site.
pub struct BuildPipeline {
    root: PathBuf,
    manifest: SiteManifest,
}

impl BuildPipeline {
    pub fn new(root: impl Into<PathBuf>, manifest: SiteManifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    pub fn manifest(&self) -> &SiteManifest {
        &self.manifest
    }

    /// Assemble and ship the site.
    ///
    /// CRITICAL: guards and the post-write validator ALWAYS run. No bypass
    /// possible. `draft` relaxes only the completeness guard.
    pub fn build(&self, draft: bool) -> Result<BuildReport, BuildError> {
        let started_at = Utc::now();

        self.check_versions()?;
        let data = SiteData::load(&self.root, &self.manifest)?;
        let site = self.assemble(&data)?;

        // Guard sequence is fixed; each category aborts on its first
        // violation.
        #[cfg(feature = "test-hooks")]
        GUARD_SUITE_RUNS.fetch_add(1, Ordering::SeqCst);

        let outputs = &self.manifest.outputs;
        guards::size_guard(
            &outputs.document,
            &site.document,
            self.manifest.guards.min_document_kb,
        )?;
        guards::size_guard(
            &outputs.stylesheet,
            &site.stylesheet,
            self.manifest.guards.min_stylesheet_kb,
        )?;
        guards::size_guard(
            &outputs.script,
            &site.script,
            self.manifest.guards.min_script_kb,
        )?;
        guards::font_uniqueness_guard(&site.stylesheet, &self.manifest.guards.fonts)?;
        let static_prefix = self.manifest.static_root.to_string_lossy();
        guards::css_asset_guard(&self.root, &site.stylesheet, &static_prefix)?;
        guards::catalog_asset_guard(&self.root, &data.catalog.rooms)?;
        guards::completeness_guard(&data.catalog.rooms, draft)?;

        let artifacts = vec![
            self.write_artifact(&outputs.document, &site.document)?,
            self.write_artifact(&outputs.stylesheet, &site.stylesheet)?,
            self.write_artifact(&outputs.script, &site.script)?,
        ];

        if let Some(argv) = &self.manifest.lint {
            self.run_lint(argv)?;
        }

        // Post-write audit over what actually landed on disk.
        let validation = InvariantValidator::new().run(&self.root, &self.manifest)?;
        if !validation.passed() {
            let details: Vec<String> = validation
                .failures()
                .map(|c| format!("{}: {}", c.id, c.description))
                .collect();
            return Err(BuildError::InvariantsFailed {
                count: validation.failure_count(),
                details: details.join("; "),
            });
        }

        Ok(BuildReport {
            build_id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            manifest_version: self.manifest.manifest_version.clone(),
            draft,
            started_at,
            elapsed_ms: (Utc::now() - started_at).num_milliseconds(),
            catalog_digest: content_digest(&data.catalog.raw)?,
            artifacts,
            invariants_checked: validation.checks.len(),
        })
    }

    /// Produce the three ordered joins plus the document's injected data
    /// blocks. Pure with respect to the output tree: nothing is written.
    pub fn assemble(&self, data: &SiteData) -> Result<AssembledSite, BuildError> {
        let stylesheet = self.join_fragments(&self.manifest.css, "\n")?;
        let script = self.join_fragments(&self.manifest.js, "\n\n")?;

        let mut pieces: Vec<String> = Vec::with_capacity(self.manifest.html.len());
        for piece in &self.manifest.html {
            match piece {
                HtmlPiece::Fragment { path } => pieces.push(self.read_src(path)?),
                HtmlPiece::Literal { text } => pieces.push(text.clone()),
                HtmlPiece::Data => pieces.push(self.injection_blocks(data)?),
            }
        }
        let document = pieces.join("\n");

        Ok(AssembledSite {
            document,
            stylesheet,
            script,
        })
    }

    fn join_fragments(&self, paths: &[String], separator: &str) -> Result<String, BuildError> {
        let mut parts: Vec<String> = Vec::with_capacity(paths.len());
        for path in paths {
            parts.push(self.read_src(path)?);
        }
        Ok(parts.join(separator))
    }

    fn read_src(&self, rel: &str) -> Result<String, BuildError> {
        content::read_text(&self.manifest.src_path(&self.root, rel))
    }

    /// The injected payloads sit after the main content region closes, so
    /// deferred end-of-body scripts can read them synchronously.
    fn injection_blocks(&self, data: &SiteData) -> Result<String, BuildError> {
        let blocks = [
            data_block(ROOMS_DATA_ID, &data.catalog.raw)?,
            data_block(LANG_VI_DATA_ID, &data.strings_vi)?,
            data_block(LANG_EN_DATA_ID, &data.strings_en)?,
        ];
        Ok(blocks.join("\n"))
    }

    fn write_artifact(&self, rel: &str, content: &str) -> Result<ArtifactReport, BuildError> {
        let path = self.root.join(rel);
        fs::write(&path, content).map_err(|source| BuildError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(ArtifactReport {
            name: rel.to_string(),
            path,
            lines: content.lines().count(),
            kilobytes: content.len() as f64 / 1024.0,
            sha256: artifact_digest(content),
        })
    }

    fn run_lint(&self, argv: &[String]) -> Result<(), BuildError> {
        let (program, args) = argv.split_first().ok_or_else(|| BuildError::ManifestInvalid {
            path: self.root.clone(),
            detail: "lint command is empty".to_string(),
        })?;
        let document = self.root.join(&self.manifest.outputs.document);
        let status = Command::new(program)
            .args(args)
            .arg(&document)
            .current_dir(&self.root)
            .status()
            .map_err(|source| BuildError::LintSpawn {
                command: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(BuildError::LintFailed {
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }

    fn check_versions(&self) -> Result<(), BuildError> {
        let invalid = |detail: String| BuildError::ManifestInvalid {
            path: self.root.clone(),
            detail,
        };
        let engine = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| invalid("invalid engine version".to_string()))?;
        let required = semver::Version::parse(&self.manifest.engine_min_version)
            .map_err(|_| invalid("invalid engineMinVersion".to_string()))?;
        if engine < required {
            return Err(BuildError::EngineVersionMismatch {
                required: self.manifest.engine_min_version.clone(),
                current: ENGINE_VERSION.to_string(),
            });
        }
        let manifest_version = semver::Version::parse(&self.manifest.manifest_version)
            .map_err(|_| invalid("invalid manifestVersion".to_string()))?;
        let supported = semver::Version::parse(MIN_MANIFEST_VERSION)
            .map_err(|_| invalid("invalid minimum manifest version".to_string()))?;
        if manifest_version < supported {
            return Err(invalid(format!(
                "manifestVersion {manifest_version} is older than the supported minimum {supported}"
            )));
        }
        Ok(())
    }
}

/// One inline data block: JSON-serialized and escaped so no substring can
/// terminate the surrounding script context early. Every `<` in the
/// serialized text is rewritten to its JSON escape, which neutralizes both
/// a closing script tag and a comment opener, and parses back to the
/// identical value on the consuming side.
pub fn data_block<T: Serialize>(id: &str, value: &T) -> Result<String, BuildError> {
    let json = escape_angle_brackets(&serde_json::to_string(value)?);
    Ok(format!(
        "    <script id=\"{id}\" type=\"application/json\">\n    {json}\n    </script>"
    ))
}

/// `<` only occurs inside string literals in serialized JSON, so the
/// rewrite always yields valid JSON.
pub fn escape_angle_brackets(json: &str) -> String {
    json.replace('<', "\\u003c")
}
