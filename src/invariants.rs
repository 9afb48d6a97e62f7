//! Invariant Validator - Post-Build Architectural Rules
//!
//! Rules produce structured check items; the validator orchestrates them
//! and aggregates every failure in one pass. Unlike the build guards this
//! layer never stops early: its purpose is exhaustive auditing, and it is
//! run both from the build (gating) and standalone as a CI gate.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::content::{self, StringTable};
use crate::error::BuildError;
use crate::manifest::SiteManifest;
use crate::report::{CheckItem, CheckReport};

/// The written artifacts plus the locale tables, re-read from disk so the
/// validator audits what will actually deploy, not in-memory state.
#[derive(Debug, Clone)]
pub struct SiteSnapshot {
    pub document: String,
    pub stylesheet: String,
    pub script: String,
    pub strings_vi: StringTable,
    pub strings_en: StringTable,
}

impl SiteSnapshot {
    pub fn load(root: &Path, manifest: &SiteManifest) -> Result<Self, BuildError> {
        let document = content::read_text(&root.join(&manifest.outputs.document))?;
        let stylesheet = content::read_text(&root.join(&manifest.outputs.stylesheet))?;
        let script = content::read_text(&root.join(&manifest.outputs.script))?;
        let strings_vi = parse_table(&manifest.src_path(root, &manifest.data.strings_vi))?;
        let strings_en = parse_table(&manifest.src_path(root, &manifest.data.strings_en))?;
        Ok(Self {
            document,
            stylesheet,
            script,
            strings_vi,
            strings_en,
        })
    }
}

fn parse_table(path: &Path) -> Result<StringTable, BuildError> {
    let raw = content::load_json(path)?;
    serde_json::from_value(raw).map_err(|source| BuildError::ParseFailure {
        file: path.to_path_buf(),
        source,
    })
}

/// One architectural rule. Every rule reports its outcome whether it
/// passed or failed.
pub trait InvariantRule {
    fn id(&self) -> &'static str;
    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem>;
}

// --- Concrete Rules ---

/// Style-declaration uniqueness, re-verified independently post-write.
pub struct FontDeclarationRule;

impl InvariantRule for FontDeclarationRule {
    fn id(&self) -> &'static str {
        "css-font-once"
    }

    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem> {
        manifest
            .guards
            .fonts
            .iter()
            .map(|family| {
                let count = snapshot.stylesheet.matches(family.as_str()).count();
                CheckItem::new(
                    self.id(),
                    format!("\"{family}\" declared exactly once in CSS (found {count})"),
                    count == 1,
                )
            })
            .collect()
    }
}

/// Structural CSS hygiene: button styling must share a base, either as a
/// dedicated selector or as grouped selectors.
pub struct SharedButtonBaseRule;

impl InvariantRule for SharedButtonBaseRule {
    fn id(&self) -> &'static str {
        "css-button-base"
    }

    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem> {
        let base = &manifest.invariants.button_base;
        let [first, second] = &manifest.invariants.grouped_buttons;
        let a = regex::escape(first);
        let b = regex::escape(second);
        let grouped = Regex::new(&format!(
            r"{a},[\s\S]{{0,200}}{b}|{b},[\s\S]{{0,200}}{a}"
        ))
        .expect("escaped selector pattern");
        let passed =
            snapshot.stylesheet.contains(base.as_str()) || grouped.is_match(&snapshot.stylesheet);
        vec![CheckItem::new(
            self.id(),
            format!("shared button base selector ({base} or grouped {first}/{second})"),
            passed,
        )]
    }
}

/// Design-token presence: named custom properties must be defined.
pub struct DesignTokenRule;

impl InvariantRule for DesignTokenRule {
    fn id(&self) -> &'static str {
        "css-token-defined"
    }

    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem> {
        manifest
            .invariants
            .design_tokens
            .iter()
            .map(|token| {
                let re = Regex::new(&format!(r"{}\s*:", regex::escape(token)))
                    .expect("escaped token pattern");
                CheckItem::new(
                    self.id(),
                    format!("{token} defined in the stylesheet"),
                    re.is_match(&snapshot.stylesheet),
                )
            })
            .collect()
    }
}

pub struct ReducedMotionRule;

impl InvariantRule for ReducedMotionRule {
    fn id(&self) -> &'static str {
        "css-reduced-motion"
    }

    fn check(&self, snapshot: &SiteSnapshot, _manifest: &SiteManifest) -> Vec<CheckItem> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"prefers-reduced-motion\s*:\s*reduce").expect("hard-coded pattern")
        });
        vec![CheckItem::new(
            self.id(),
            "@media (prefers-reduced-motion: reduce) exists in CSS",
            re.is_match(&snapshot.stylesheet),
        )]
    }
}

pub struct MobileBreakpointRule;

impl InvariantRule for MobileBreakpointRule {
    fn id(&self) -> &'static str {
        "css-mobile-breakpoint"
    }

    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem> {
        let breakpoint = &manifest.invariants.mobile_breakpoint;
        let re = Regex::new(&format!(r"max-width\s*:\s*{}", regex::escape(breakpoint)))
            .expect("escaped breakpoint pattern");
        vec![CheckItem::new(
            self.id(),
            format!("@media (max-width: {breakpoint}) exists in CSS"),
            re.is_match(&snapshot.stylesheet),
        )]
    }
}

/// The pre-migration asset prefix must never reappear.
pub struct LegacyAssetPathRule;

impl InvariantRule for LegacyAssetPathRule {
    fn id(&self) -> &'static str {
        "css-no-legacy-paths"
    }

    fn check(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> Vec<CheckItem> {
        let prefix = &manifest.invariants.legacy_asset_prefix;
        let re = Regex::new(&format!(r#"url\(["']?{}"#, regex::escape(prefix)))
            .expect("escaped prefix pattern");
        vec![CheckItem::new(
            self.id(),
            format!("no legacy url({prefix}...) references in the stylesheet"),
            !re.is_match(&snapshot.stylesheet),
        )]
    }
}

/// All imagery routes through CSS backgrounds or lazy-loading; the
/// document itself carries no image elements outside comments.
pub struct NoImageTagRule;

impl InvariantRule for NoImageTagRule {
    fn id(&self) -> &'static str {
        "html-no-img-tags"
    }

    fn check(&self, snapshot: &SiteSnapshot, _manifest: &SiteManifest) -> Vec<CheckItem> {
        static COMMENTS: OnceLock<Regex> = OnceLock::new();
        static IMG: OnceLock<Regex> = OnceLock::new();
        let comments =
            COMMENTS.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("hard-coded pattern"));
        let img = IMG.get_or_init(|| Regex::new(r"(?i)<img[\s>]").expect("hard-coded pattern"));
        let without_comments = comments.replace_all(&snapshot.document, "");
        vec![CheckItem::new(
            self.id(),
            "no <img> tags in the document (all images are CSS backgrounds)",
            !img.is_match(&without_comments),
        )]
    }
}

/// Locale key parity, both directions, with the missing keys named.
pub struct LocaleParityRule;

impl LocaleParityRule {
    fn missing_from<'a>(from: &'a StringTable, into: &StringTable) -> Vec<&'a str> {
        from.keys()
            .filter(|k| !into.contains_key(*k))
            .map(String::as_str)
            .collect()
    }

    fn describe(direction: &str, missing: &[&str]) -> String {
        let named = if missing.is_empty() {
            "none".to_string()
        } else {
            missing.join(", ")
        };
        format!("{direction} (missing: {named})")
    }
}

impl InvariantRule for LocaleParityRule {
    fn id(&self) -> &'static str {
        "i18n-key-parity"
    }

    fn check(&self, snapshot: &SiteSnapshot, _manifest: &SiteManifest) -> Vec<CheckItem> {
        let missing_in_en = Self::missing_from(&snapshot.strings_vi, &snapshot.strings_en);
        let missing_in_vi = Self::missing_from(&snapshot.strings_en, &snapshot.strings_vi);
        vec![
            CheckItem::new(
                self.id(),
                Self::describe("all vi keys present in en", &missing_in_en),
                missing_in_en.is_empty(),
            ),
            CheckItem::new(
                self.id(),
                Self::describe("all en keys present in vi", &missing_in_vi),
                missing_in_vi.is_empty(),
            ),
        ]
    }
}

/// Validator orchestrates the fixed rule checklist.
pub struct InvariantValidator {
    rules: Vec<Box<dyn InvariantRule>>,
}

impl InvariantValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FontDeclarationRule),
                Box::new(SharedButtonBaseRule),
                Box::new(DesignTokenRule),
                Box::new(ReducedMotionRule),
                Box::new(MobileBreakpointRule),
                Box::new(LegacyAssetPathRule),
                Box::new(NoImageTagRule),
                Box::new(LocaleParityRule),
            ],
        }
    }

    pub fn evaluate(&self, snapshot: &SiteSnapshot, manifest: &SiteManifest) -> CheckReport {
        let mut report = CheckReport::new("Trạm CP12 — Architectural Invariants");
        for rule in &self.rules {
            report.extend(rule.check(snapshot, manifest));
        }
        report
    }

    /// Re-read the written artifacts and evaluate every rule.
    pub fn run(&self, root: &Path, manifest: &SiteManifest) -> Result<CheckReport, BuildError> {
        let snapshot = SiteSnapshot::load(root, manifest)?;
        Ok(self.evaluate(&snapshot, manifest))
    }
}

impl Default for InvariantValidator {
    fn default() -> Self {
        Self::new()
    }
}
