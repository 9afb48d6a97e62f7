//! Site Manifest - Versioned Build Configuration
//!
//! Concatenation order is the entire rendering model: CSS order is cascade
//! precedence, HTML order is DOM position, JS order is execution order.
//! The manifest is therefore explicit, versioned configuration — never a
//! directory scan, whose ordering is not stable across platforms.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteManifest {
    pub manifest_version: String,
    #[serde(default = "default_engine_min")]
    pub engine_min_version: String,
    #[serde(default = "default_src_root")]
    pub src_root: PathBuf,
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
    #[serde(default)]
    pub outputs: OutputPaths,
    /// Stylesheet fragments in cascade order, relative to `srcRoot`.
    pub css: Vec<String>,
    /// Document pieces in DOM order. Exactly one must be the data piece.
    pub html: Vec<HtmlPiece>,
    /// Script fragments in execution order; later modules may assume
    /// globals exposed by earlier ones.
    pub js: Vec<String>,
    pub data: DataFiles,
    #[serde(default)]
    pub guards: GuardConfig,
    #[serde(default)]
    pub invariants: InvariantConfig,
    #[serde(default)]
    pub expectations: SchemaExpectations,
    /// Optional external markup-linter argv, run against the written
    /// document from the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lint: Option<Vec<String>>,
}

fn default_engine_min() -> String {
    "1.0.0".to_string()
}

fn default_src_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_static_root() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPaths {
    #[serde(default = "default_document")]
    pub document: String,
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    #[serde(default = "default_script")]
    pub script: String,
}

fn default_document() -> String {
    "index.html".to_string()
}

fn default_stylesheet() -> String {
    "cp12.css".to_string()
}

fn default_script() -> String {
    "cp12.js".to_string()
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            document: default_document(),
            stylesheet: default_stylesheet(),
            script: default_script(),
        }
    }
}

/// One entry of the document manifest: a source partial, a literal
/// interstitial (wrapper open/close markup), or the data-injection point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HtmlPiece {
    Fragment { path: String },
    Literal { text: String },
    Data,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFiles {
    pub rooms: String,
    pub strings_vi: String,
    pub strings_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardConfig {
    #[serde(default = "default_min_document_kb")]
    pub min_document_kb: f64,
    #[serde(default = "default_min_stylesheet_kb")]
    pub min_stylesheet_kb: f64,
    #[serde(default = "default_min_script_kb")]
    pub min_script_kb: f64,
    /// Each family must appear exactly once in the assembled stylesheet.
    #[serde(default = "default_fonts")]
    pub fonts: Vec<String>,
}

fn default_min_document_kb() -> f64 {
    30.0
}

fn default_min_stylesheet_kb() -> f64 {
    40.0
}

fn default_min_script_kb() -> f64 {
    8.0
}

fn default_fonts() -> Vec<String> {
    vec![
        "Cormorant Garamond".to_string(),
        "Be Vietnam Pro".to_string(),
    ]
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_document_kb: default_min_document_kb(),
            min_stylesheet_kb: default_min_stylesheet_kb(),
            min_script_kb: default_min_script_kb(),
            fonts: default_fonts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantConfig {
    #[serde(default = "default_design_tokens")]
    pub design_tokens: Vec<String>,
    #[serde(default = "default_button_base")]
    pub button_base: String,
    #[serde(default = "default_grouped_buttons")]
    pub grouped_buttons: [String; 2],
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: String,
    #[serde(default = "default_legacy_asset_prefix")]
    pub legacy_asset_prefix: String,
}

fn default_design_tokens() -> Vec<String> {
    vec!["--gold-20".to_string(), "--pine-dark-90".to_string()]
}

fn default_button_base() -> String {
    ".btn-base".to_string()
}

fn default_grouped_buttons() -> [String; 2] {
    [".btn-primary".to_string(), ".btn-gold".to_string()]
}

fn default_mobile_breakpoint() -> String {
    "768px".to_string()
}

fn default_legacy_asset_prefix() -> String {
    "img/".to_string()
}

impl Default for InvariantConfig {
    fn default() -> Self {
        Self {
            design_tokens: default_design_tokens(),
            button_base: default_button_base(),
            grouped_buttons: default_grouped_buttons(),
            mobile_breakpoint: default_mobile_breakpoint(),
            legacy_asset_prefix: default_legacy_asset_prefix(),
        }
    }
}

/// Expected cardinalities and landmarks for the content-schema suite.
/// These pin down assumptions the manifest alone leaves implicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaExpectations {
    #[serde(default = "default_rooms_count")]
    pub rooms: usize,
    #[serde(default = "default_featured_min")]
    pub featured_min: usize,
    #[serde(default = "default_travel_count")]
    pub travel: usize,
    #[serde(default = "default_travel_categories")]
    pub travel_categories: Vec<String>,
    #[serde(default = "default_journal_count")]
    pub journal: usize,
    #[serde(default = "default_large_journal")]
    pub large_journal_entries: usize,
    #[serde(default = "default_required_string_keys")]
    pub required_string_keys: Vec<String>,
    #[serde(default = "default_main_id")]
    pub main_id: String,
    #[serde(default = "default_section_ids")]
    pub section_ids: Vec<String>,
}

fn default_rooms_count() -> usize {
    4
}

fn default_featured_min() -> usize {
    1
}

fn default_travel_count() -> usize {
    6
}

fn default_travel_categories() -> Vec<String> {
    vec![
        "running".to_string(),
        "food".to_string(),
        "nature".to_string(),
    ]
}

fn default_journal_count() -> usize {
    3
}

fn default_large_journal() -> usize {
    1
}

fn default_required_string_keys() -> Vec<String> {
    [
        "nav.rooms",
        "nav.explore",
        "nav.about",
        "nav.journal",
        "nav.book",
        "hero.tag",
        "hero.title",
        "hero.subtitle",
        "rooms.label",
        "rooms.heading",
        "explore.label",
        "about.label",
        "journal.label",
        "cta.label",
        "zalo.cta",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_main_id() -> String {
    "cp12-main".to_string()
}

fn default_section_ids() -> Vec<String> {
    [
        "home", "video", "rooms", "explore", "about", "journal", "book",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

impl Default for SchemaExpectations {
    fn default() -> Self {
        Self {
            rooms: default_rooms_count(),
            featured_min: default_featured_min(),
            travel: default_travel_count(),
            travel_categories: default_travel_categories(),
            journal: default_journal_count(),
            large_journal_entries: default_large_journal(),
            required_string_keys: default_required_string_keys(),
            main_id: default_main_id(),
            section_ids: default_section_ids(),
        }
    }
}

impl SiteManifest {
    /// Load and structurally check a manifest file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => BuildError::SourceMissing {
                path: path.to_path_buf(),
            },
            _ => BuildError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let manifest: SiteManifest =
            serde_json::from_str(&content).map_err(|source| BuildError::ParseFailure {
                file: path.to_path_buf(),
                source,
            })?;
        manifest.check_shape(path)?;
        Ok(manifest)
    }

    fn check_shape(&self, path: &Path) -> Result<(), BuildError> {
        let invalid = |detail: &str| BuildError::ManifestInvalid {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        };
        if self.css.is_empty() {
            return Err(invalid("css fragment list is empty"));
        }
        if self.js.is_empty() {
            return Err(invalid("js fragment list is empty"));
        }
        let data_pieces = self
            .html
            .iter()
            .filter(|p| matches!(p, HtmlPiece::Data))
            .count();
        if data_pieces != 1 {
            return Err(invalid(&format!(
                "html manifest must contain exactly one data piece, found {data_pieces}"
            )));
        }
        Ok(())
    }

    /// Resolve a source-relative fragment path against the project root.
    pub fn src_path(&self, root: &Path, rel: &str) -> PathBuf {
        root.join(&self.src_root).join(rel)
    }

    /// Every source-relative path the manifest references: fragments of all
    /// three artifact types plus the data files.
    pub fn referenced_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        paths.extend(self.css.iter().cloned());
        for piece in &self.html {
            if let HtmlPiece::Fragment { path } = piece {
                paths.push(path.clone());
            }
        }
        paths.extend(self.js.iter().cloned());
        paths.push(self.data.rooms.clone());
        paths.push(self.data.strings_vi.clone());
        paths.push(self.data.strings_en.clone());
        if let Some(travel) = &self.data.travel {
            paths.push(travel.clone());
        }
        if let Some(journal) = &self.data.journal {
            paths.push(journal.clone());
        }
        paths
    }
}
