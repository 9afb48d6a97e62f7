//! Build Guards
//!
//! Independent build-time assertions, run in a fixed sequence. Each aborts
//! the build on its first violation with the file, path, or field named.

use regex::Regex;
use std::path::Path;

use crate::content::Room;
use crate::error::BuildError;

/// Coarse but load-bearing: an implausibly small artifact means a fragment
/// silently resolved to empty content (e.g. a rename broke a manifest
/// entry) and must not ship.
pub fn size_guard(artifact: &str, content: &str, min_kb: f64) -> Result<(), BuildError> {
    let actual_kb = content.len() as f64 / 1024.0;
    if actual_kb < min_kb {
        return Err(BuildError::SizeGuard {
            artifact: artifact.to_string(),
            actual_kb,
            min_kb,
        });
    }
    Ok(())
}

/// Each named font family must appear in the assembled stylesheet exactly
/// once: zero means a dropped declaration, more than one means a duplicate
/// pasted in by careless fragment editing.
pub fn font_uniqueness_guard(css: &str, fonts: &[String]) -> Result<(), BuildError> {
    for family in fonts {
        let count = css.matches(family.as_str()).count();
        if count != 1 {
            return Err(BuildError::FontGuard {
                family: family.clone(),
                count,
            });
        }
    }
    Ok(())
}

fn css_url_re(static_prefix: &str) -> Regex {
    let pattern = format!(
        r#"url\(\s*["']?({}/[^"')\s]+)"#,
        regex::escape(static_prefix)
    );
    Regex::new(&pattern).expect("escaped literal prefix")
}

/// Every `url(...)` reference under the static-asset prefix must resolve
/// on disk. A pattern match is enough here: all such references come from
/// this build's own fragments, so the path syntax is controlled.
pub fn css_asset_guard(root: &Path, css: &str, static_prefix: &str) -> Result<(), BuildError> {
    let re = css_url_re(static_prefix);
    for capture in re.captures_iter(css) {
        let rel = &capture[1];
        let resolved = root.join(rel);
        if !resolved.is_file() {
            return Err(BuildError::AssetMissing {
                context: format!("stylesheet url({rel})"),
                path: resolved,
            });
        }
    }
    Ok(())
}

/// Every declared room photo must carry a `src` that resolves on disk; a
/// room with zero photos is a valid state.
pub fn catalog_asset_guard(root: &Path, rooms: &[Room]) -> Result<(), BuildError> {
    for (index, room) in rooms.iter().enumerate() {
        if let Some(cover) = &room.cover_photo {
            let resolved = root.join(cover);
            if !resolved.is_file() {
                return Err(BuildError::AssetMissing {
                    context: format!("{}.coverPhoto", room.label(index)),
                    path: resolved,
                });
            }
        }
        for (photo_index, photo) in room.photos.iter().enumerate() {
            let src = match &photo.src {
                Some(src) if !src.is_empty() => src,
                _ => {
                    return Err(BuildError::DataIncomplete {
                        entity: room.label(index),
                        field: format!("photos[{photo_index}].src"),
                    })
                }
            };
            let resolved = root.join(src);
            if !resolved.is_file() {
                return Err(BuildError::AssetMissing {
                    context: format!("{}.photos[{photo_index}]", room.label(index)),
                    path: resolved,
                });
            }
        }
    }
    Ok(())
}

/// Required display fields must be filled in. Draft mode is a local
/// content-editing escape hatch, never an automated/CI build path.
pub fn completeness_guard(rooms: &[Room], draft: bool) -> Result<(), BuildError> {
    if draft {
        return Ok(());
    }
    for (index, room) in rooms.iter().enumerate() {
        if room.name.trim().is_empty() {
            return Err(BuildError::DataIncomplete {
                entity: room.label(index),
                field: "name".to_string(),
            });
        }
        if room.price.trim().is_empty() {
            return Err(BuildError::DataIncomplete {
                entity: room.label(index),
                field: "price".to_string(),
            });
        }
    }
    Ok(())
}
