//! Content Data Model
//!
//! The room catalog and locale string tables are authored by a content
//! editor, read once per build, and never mutated by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::BuildError;
use crate::manifest::SiteManifest;
use crate::sanitize;

/// Flat dotted-key to localized text mapping. A `BTreeMap` keeps the
/// serialized injection payload deterministic across builds.
pub type StringTable = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaItem {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub alt_vi: String,
}

/// One bookable unit. Display fields come in parallel localized variants;
/// the media set is optional (a room with zero photos is valid and falls
/// back to a non-photographic treatment downstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "bgClass", skip_serializing_if = "Option::is_none")]
    pub bg_class: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_vi: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub desc_vi: String,
    #[serde(default)]
    pub meta: Vec<MetaItem>,
    #[serde(default)]
    pub meta_vi: Vec<MetaItem>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub amenities_vi: Vec<String>,
    #[serde(default, rename = "coverPhoto", skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Room {
    /// Label used in guard errors: index plus id when one is set.
    pub fn label(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("rooms[{index}]")
        } else {
            format!("rooms[{index}] ({})", self.id)
        }
    }
}

/// The room catalog, kept both typed (for the guards) and raw (for the
/// injection payload, so the embedded JSON round-trips deep-equal to the
/// authored file).
#[derive(Debug, Clone)]
pub struct Catalog {
    pub raw: Value,
    pub rooms: Vec<Room>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let raw = load_json(path)?;
        let rooms: Vec<Room> =
            serde_json::from_value(raw.clone()).map_err(|source| BuildError::ParseFailure {
                file: path.to_path_buf(),
                source,
            })?;
        Ok(Self { raw, rooms })
    }
}

/// Everything the assembler injects or the guards inspect, loaded and
/// sanitized in one pass.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub catalog: Catalog,
    pub strings_vi: StringTable,
    pub strings_en: StringTable,
}

impl SiteData {
    pub fn load(root: &Path, manifest: &SiteManifest) -> Result<Self, BuildError> {
        let catalog = Catalog::load(&manifest.src_path(root, &manifest.data.rooms))?;
        let strings_vi = load_string_table(&manifest.src_path(root, &manifest.data.strings_vi))?;
        let strings_en = load_string_table(&manifest.src_path(root, &manifest.data.strings_en))?;
        Ok(Self {
            catalog,
            strings_vi,
            strings_en,
        })
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => BuildError::SourceMissing {
            path: path.to_path_buf(),
        },
        _ => BuildError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Parse a JSON content file, identifying the offending file on failure.
/// Malformed JSON is never silently replaced with a default.
pub fn load_json(path: &Path) -> Result<Value, BuildError> {
    let content = read_text(path)?;
    serde_json::from_str(&content).map_err(|source| BuildError::ParseFailure {
        file: path.to_path_buf(),
        source,
    })
}

/// Load one locale's string table and run every value through the
/// inline-markup allowlist before it is permitted into injected output.
pub fn load_string_table(path: &Path) -> Result<StringTable, BuildError> {
    let content = read_text(path)?;
    let table: StringTable =
        serde_json::from_str(&content).map_err(|source| BuildError::ParseFailure {
            file: path.to_path_buf(),
            source,
        })?;
    sanitize::check_table(path, &table)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn catalog_parses_rooms_with_optional_media() {
        let json = r#"[
            {"id": "jan-01", "name": "Signature", "price": "580K", "featured": true,
             "coverPhoto": "static/img/rooms/catalog/jan-01.jpg",
             "photos": [{"src": "static/img/rooms/details/jan-01/door.jpg", "alt": "Door", "alt_vi": ""}]},
            {"id": "feb-02", "name": "Garden", "price": "480K"}
        ]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.rooms.len(), 2);
        assert_eq!(catalog.rooms[0].photos.len(), 1);
        assert!(catalog.rooms[1].photos.is_empty());
        assert!(catalog.rooms[1].cover_photo.is_none());
    }

    #[test]
    fn malformed_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_json(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("JSON parse error"));
        assert!(message.contains(&file.path().display().to_string()));
    }

    #[test]
    fn room_label_includes_id_when_present() {
        let room = Room {
            id: "oct-10".to_string(),
            ..serde_json::from_str::<Room>("{}").unwrap()
        };
        assert_eq!(room.label(2), "rooms[2] (oct-10)");
    }
}
