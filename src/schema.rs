//! Content-Schema Suite
//!
//! A broader audit than the architectural invariants: source-file
//! coverage, JSON content shape, and generated-output landmarks. The
//! manifest and data files embed assumptions ("this many rooms", "one
//! large journal card") that nothing else verifies; this suite turns them
//! into explicit assertions. Diagnostic, never fail-fast: every violation
//! is reported in a single pass.

use regex::Regex;
use serde_json::Value;
use std::path::Path;

use crate::content;
use crate::invariants::SiteSnapshot;
use crate::manifest::SiteManifest;
use crate::report::CheckReport;

const ROOM_REQUIRED_KEYS: &[&str] = &[
    "bgClass",
    "name",
    "price",
    "featured",
    "meta",
    "desc",
    "amenities",
    "desc_vi",
    "meta_vi",
    "amenities_vi",
];

const TRAVEL_REQUIRED_KEYS: &[&str] = &[
    "bgClass",
    "category",
    "difficulty",
    "cat",
    "name",
    "distance",
    "duration",
    "highlight",
];

const JOURNAL_REQUIRED_KEYS: &[&str] = &[
    "bgClass",
    "large",
    "imgLabel",
    "cat",
    "title",
    "excerpt",
    "linkLabel",
    "href",
];

pub struct SchemaSuite;

impl SchemaSuite {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, root: &Path, manifest: &SiteManifest) -> CheckReport {
        let mut report = CheckReport::new("Trạm CP12 — Content Schema");
        self.check_source_coverage(root, manifest, &mut report);
        self.check_rooms(root, manifest, &mut report);
        self.check_travel(root, manifest, &mut report);
        self.check_journal(root, manifest, &mut report);
        self.check_string_tables(root, manifest, &mut report);
        self.check_outputs(root, manifest, &mut report);
        report
    }

    fn check_source_coverage(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        for rel in manifest.referenced_paths() {
            let path = manifest.src_path(root, &rel);
            report.record("src-exists", rel, path.is_file());
        }
    }

    fn load_array(
        &self,
        root: &Path,
        manifest: &SiteManifest,
        rel: &str,
        label: &str,
        report: &mut CheckReport,
    ) -> Option<Vec<Value>> {
        let path = manifest.src_path(root, rel);
        match content::load_json(&path) {
            Ok(Value::Array(entries)) => {
                report.record("data-shape", format!("{label} is a JSON array"), true);
                Some(entries)
            }
            Ok(_) => {
                report.record("data-shape", format!("{label} is a JSON array"), false);
                None
            }
            Err(err) => {
                report.record("data-shape", format!("{label} parses: {err}"), false);
                None
            }
        }
    }

    fn missing_keys(entry: &Value, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|key| entry.get(**key).is_none())
            .map(|key| key.to_string())
            .collect()
    }

    fn record_entry_keys(
        label: &str,
        entries: &[Value],
        required: &[&str],
        report: &mut CheckReport,
    ) {
        for (index, entry) in entries.iter().enumerate() {
            let missing = Self::missing_keys(entry, required);
            let named = if missing.is_empty() {
                "none".to_string()
            } else {
                missing.join(", ")
            };
            report.record(
                "data-shape",
                format!("{label}[{index}] required fields (missing: {named})"),
                missing.is_empty(),
            );
        }
    }

    fn check_rooms(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        let Some(rooms) = self.load_array(root, manifest, &manifest.data.rooms, "rooms", report)
        else {
            return;
        };
        let expected = manifest.expectations.rooms;
        report.record(
            "data-shape",
            format!("rooms has {expected} entries (found {})", rooms.len()),
            rooms.len() == expected,
        );
        Self::record_entry_keys("rooms", &rooms, ROOM_REQUIRED_KEYS, report);

        for (index, room) in rooms.iter().enumerate() {
            let meta_ok = room
                .get("meta")
                .and_then(Value::as_array)
                .is_some_and(|meta| {
                    !meta.is_empty()
                        && meta
                            .iter()
                            .all(|m| m.get("icon").is_some() && m.get("text").is_some())
                });
            report.record(
                "data-shape",
                format!("rooms[{index}].meta is a non-empty icon/text list"),
                meta_ok,
            );
            let amenities_ok = room
                .get("amenities")
                .and_then(Value::as_array)
                .is_some_and(|a| !a.is_empty());
            report.record(
                "data-shape",
                format!("rooms[{index}].amenities is a non-empty array"),
                amenities_ok,
            );
            let bg_ok = room
                .get("bgClass")
                .and_then(Value::as_str)
                .is_some_and(|bg| {
                    bg.len() > 1 && bg.starts_with('r') && bg[1..].chars().all(|c| c.is_ascii_digit())
                });
            report.record(
                "data-shape",
                format!("rooms[{index}].bgClass is an r-numbered class"),
                bg_ok,
            );
        }

        let featured = rooms
            .iter()
            .filter(|r| r.get("featured").and_then(Value::as_bool) == Some(true))
            .count();
        let minimum = manifest.expectations.featured_min;
        report.record(
            "data-shape",
            format!("rooms has at least {minimum} featured entry (found {featured})"),
            featured >= minimum,
        );
    }

    fn check_travel(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        let Some(rel) = &manifest.data.travel else {
            return;
        };
        let Some(travel) = self.load_array(root, manifest, rel, "travel", report) else {
            return;
        };
        let expected = manifest.expectations.travel;
        report.record(
            "data-shape",
            format!("travel has {expected} entries (found {})", travel.len()),
            travel.len() == expected,
        );
        Self::record_entry_keys("travel", &travel, TRAVEL_REQUIRED_KEYS, report);

        let categories: Vec<&str> = travel
            .iter()
            .filter_map(|t| t.get("category").and_then(Value::as_str))
            .collect();
        for expected_category in &manifest.expectations.travel_categories {
            report.record(
                "data-shape",
                format!("travel category \"{expected_category}\" represented"),
                categories.contains(&expected_category.as_str()),
            );
        }
    }

    fn check_journal(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        let Some(rel) = &manifest.data.journal else {
            return;
        };
        let Some(journal) = self.load_array(root, manifest, rel, "journal", report) else {
            return;
        };
        let expected = manifest.expectations.journal;
        report.record(
            "data-shape",
            format!("journal has {expected} entries (found {})", journal.len()),
            journal.len() == expected,
        );
        Self::record_entry_keys("journal", &journal, JOURNAL_REQUIRED_KEYS, report);

        let large = journal
            .iter()
            .filter(|j| j.get("large").and_then(Value::as_bool) == Some(true))
            .count();
        let expected_large = manifest.expectations.large_journal_entries;
        report.record(
            "data-shape",
            format!("journal has exactly {expected_large} large card(s) (found {large})"),
            large == expected_large,
        );
    }

    fn check_string_tables(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        for (label, rel) in [
            ("strings.vi", &manifest.data.strings_vi),
            ("strings.en", &manifest.data.strings_en),
        ] {
            let path = manifest.src_path(root, rel);
            let table = match content::load_json(&path) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    report.record("data-shape", format!("{label} is a JSON object"), false);
                    continue;
                }
                Err(err) => {
                    report.record("data-shape", format!("{label} parses: {err}"), false);
                    continue;
                }
            };
            let missing: Vec<&str> = manifest
                .expectations
                .required_string_keys
                .iter()
                .filter(|key| {
                    !table
                        .get(key.as_str())
                        .and_then(Value::as_str)
                        .is_some_and(|v| !v.is_empty())
                })
                .map(String::as_str)
                .collect();
            let named = if missing.is_empty() {
                "none".to_string()
            } else {
                missing.join(", ")
            };
            report.record(
                "data-shape",
                format!("{label} has every required key (missing: {named})"),
                missing.is_empty(),
            );
        }
    }

    fn check_outputs(&self, root: &Path, manifest: &SiteManifest, report: &mut CheckReport) {
        let snapshot = match SiteSnapshot::load(root, manifest) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                report.record("output", format!("written artifacts readable: {err}"), false);
                return;
            }
        };
        let outputs = &manifest.outputs;
        let guards = &manifest.guards;

        for (name, content, min_kb) in [
            (&outputs.document, &snapshot.document, guards.min_document_kb),
            (
                &outputs.stylesheet,
                &snapshot.stylesheet,
                guards.min_stylesheet_kb,
            ),
            (&outputs.script, &snapshot.script, guards.min_script_kb),
        ] {
            let actual = content.len() as f64 / 1024.0;
            report.record(
                "output",
                format!("{name} exceeds {min_kb} KB (found {actual:.1} KB)"),
                actual > min_kb,
            );
        }

        self.check_injection_block(
            &snapshot.document,
            crate::pipeline::ROOMS_DATA_ID,
            Some(manifest.expectations.rooms),
            report,
        );
        self.check_injection_block(
            &snapshot.document,
            crate::pipeline::LANG_VI_DATA_ID,
            None,
            report,
        );
        self.check_injection_block(
            &snapshot.document,
            crate::pipeline::LANG_EN_DATA_ID,
            None,
            report,
        );

        let main_id = &manifest.expectations.main_id;
        let main_open = format!("<main id=\"{main_id}\">");
        report.record(
            "output",
            format!("document contains {main_open}"),
            snapshot.document.contains(&main_open),
        );

        // The data blocks must land after the main content region closes
        // so deferred scripts can read them without racing the parser.
        let rooms_marker = format!("id=\"{}\"", crate::pipeline::ROOMS_DATA_ID);
        let ordered = match (
            snapshot.document.find("</main>"),
            snapshot.document.find(&rooms_marker),
        ) {
            (Some(main_close), Some(data_start)) => data_start > main_close,
            _ => false,
        };
        report.record("output", "data blocks come after the main region closes", ordered);

        for section in &manifest.expectations.section_ids {
            let marker = format!("id=\"{section}\"");
            report.record(
                "output",
                format!("document contains section #{section}"),
                snapshot.document.contains(&marker),
            );
        }

        for (label, pattern) in [
            ("og:image meta", r#"property="og:image""#),
            ("twitter:card meta", r#"name="twitter:card""#),
            ("canonical link", r#"rel="canonical""#),
            ("theme-color meta", "theme-color"),
        ] {
            report.record(
                "output",
                format!("document contains {label}"),
                snapshot.document.contains(pattern),
            );
        }

        let deferred = format!("src=\"{}\" defer", outputs.script);
        report.record(
            "output",
            format!("document loads {} deferred", outputs.script),
            snapshot.document.contains(&deferred),
        );
    }

    fn check_injection_block(
        &self,
        document: &str,
        id: &str,
        expect_array_len: Option<usize>,
        report: &mut CheckReport,
    ) {
        let pattern = format!(
            r#"(?s)<script id="{}" type="application/json">(.*?)</script>"#,
            regex::escape(id)
        );
        let re = Regex::new(&pattern).expect("escaped id pattern");
        let Some(captures) = re.captures(document) else {
            report.record("output", format!("document embeds #{id} block"), false);
            return;
        };
        report.record("output", format!("document embeds #{id} block"), true);
        let payload = captures[1].trim().to_string();
        match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Array(entries)) => {
                if let Some(expected) = expect_array_len {
                    report.record(
                        "output",
                        format!(
                            "#{id} payload is a JSON array of {expected} (found {})",
                            entries.len()
                        ),
                        entries.len() == expected,
                    );
                } else {
                    report.record("output", format!("#{id} payload is valid JSON"), true);
                }
            }
            Ok(Value::Object(_)) => {
                report.record(
                    "output",
                    format!("#{id} payload is valid JSON"),
                    expect_array_len.is_none(),
                );
            }
            Ok(_) | Err(_) => {
                report.record("output", format!("#{id} payload is valid JSON"), false);
            }
        }
    }
}

impl Default for SchemaSuite {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_names_each_absent_field() {
        let entry = json!({"name": "Signature", "price": "580K"});
        let missing = SchemaSuite::missing_keys(&entry, &["name", "price", "featured", "desc"]);
        assert_eq!(missing, vec!["featured".to_string(), "desc".to_string()]);
    }

    #[test]
    fn injection_block_check_parses_embedded_payload() {
        let document = concat!(
            "<main id=\"cp12-main\"></main>\n",
            "    <script id=\"rooms-data\" type=\"application/json\">\n",
            "    [{\"id\": \"jan-01\"}, {\"id\": \"feb-02\"}]\n",
            "    </script>"
        );
        let mut report = CheckReport::new("test");
        SchemaSuite.check_injection_block(document, "rooms-data", Some(2), &mut report);
        assert!(report.passed(), "{}", report.render());
        let mut wrong_count = CheckReport::new("test");
        SchemaSuite.check_injection_block(document, "rooms-data", Some(4), &mut wrong_count);
        assert!(!wrong_count.passed());
    }
}
