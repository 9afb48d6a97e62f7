//! Catalog Seeding
//!
//! Scans the static image tree and generates a stub room catalog with
//! cover photos, detail photo lists, and filename-derived alt text. Run
//! once after dropping photos in, then fill in the editorial fields.
//!
//! Filename order is only used for a room's photo sequence, where order
//! is not load-bearing; artifact concatenation order always comes from
//! the manifest.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{self, Photo, Room};
use crate::error::BuildError;
use crate::manifest::SiteManifest;

/// Room ids in display order (jan = room 1, nov = room 11).
const ROOM_SORT: &[&str] = &[
    "jan-01", "feb-02", "mar-03", "aug-08", "sep-09", "oct-10", "nov-11",
];

/// Filename-word corrections applied during alt-text derivation.
fn correct_word(word: &str) -> Option<&'static str> {
    match word.to_ascii_lowercase().as_str() {
        "decord" => Some("Décor"),
        "decords" => Some("Décors"),
        _ => None,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a photo filename to readable alt text.
///
/// "1-bed-view-1" becomes "Bed View, Photo 1"; "balcony-door" becomes
/// "Balcony Door"; "decord" becomes "Décor". The result is a starting
/// point for the content editor, not finished copy.
pub fn file_to_alt(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    // Strip a leading numeric prefix: "1-bed" -> "bed".
    let mut base = match stem.split_once('-') {
        Some((head, rest)) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => stem,
    };

    // A trailing photo number becomes a ", Photo N" suffix.
    let mut suffix = String::new();
    if let Some((head, tail)) = base.rsplit_once('-') {
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            suffix = format!(", Photo {tail}");
            base = head;
        }
    }

    let words: Vec<String> = base
        .split('-')
        .map(|word| match correct_word(word) {
            Some(corrected) => corrected.to_string(),
            None => title_case(word),
        })
        .collect();

    words.join(" ") + &suffix
}

fn is_photo_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["jpg", "jpeg", "png", "webp"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

#[derive(Debug)]
pub struct SeedOutcome {
    pub path: PathBuf,
    pub rooms: usize,
    /// True when an already-edited catalog was left untouched.
    pub skipped: bool,
}

/// Generate a stub catalog, refusing to overwrite editorial work: if any
/// existing room already has a non-empty name, the catalog is left alone.
pub fn seed_catalog(root: &Path, manifest: &SiteManifest) -> Result<SeedOutcome, BuildError> {
    let catalog_path = manifest.src_path(root, &manifest.data.rooms);

    if catalog_path.is_file() {
        let existing = content::load_json(&catalog_path)?;
        let any_edited = existing
            .as_array()
            .is_some_and(|rooms| {
                rooms.iter().any(|room| {
                    room.get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|name| !name.is_empty())
                })
            });
        if any_edited {
            return Ok(SeedOutcome {
                path: catalog_path,
                rooms: 0,
                skipped: true,
            });
        }
    }

    let static_rel = manifest.static_root.to_string_lossy();
    let details_dir = root
        .join(&manifest.static_root)
        .join("img")
        .join("rooms")
        .join("details");

    let rooms: Vec<Room> = ROOM_SORT
        .iter()
        .map(|id| {
            let photos = scan_detail_photos(&details_dir, &static_rel, id)?;
            Ok(Room {
                id: id.to_string(),
                bg_class: None,
                name: String::new(),
                name_vi: String::new(),
                price: String::new(),
                featured: false,
                desc: String::new(),
                desc_vi: String::new(),
                meta: Vec::new(),
                meta_vi: Vec::new(),
                amenities: Vec::new(),
                amenities_vi: Vec::new(),
                cover_photo: Some(format!("{static_rel}/img/rooms/catalog/{id}.jpg")),
                photos,
            })
        })
        .collect::<Result<_, BuildError>>()?;

    let count = rooms.len();
    let json = serde_json::to_string_pretty(&rooms)?;
    fs::write(&catalog_path, json + "\n").map_err(|source| BuildError::Io {
        path: catalog_path.clone(),
        source,
    })?;

    Ok(SeedOutcome {
        path: catalog_path,
        rooms: count,
        skipped: false,
    })
}

fn scan_detail_photos(
    details_dir: &Path,
    static_rel: &str,
    id: &str,
) -> Result<Vec<Photo>, BuildError> {
    let folder = details_dir.join(id);
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(&folder).map_err(|source| BuildError::Io {
        path: folder.clone(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_photo_file(name))
        .collect();
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| Photo {
            src: Some(format!("{static_rel}/img/rooms/details/{id}/{name}")),
            alt: file_to_alt(&name),
            alt_vi: String::new(),
        })
        .collect())
}
