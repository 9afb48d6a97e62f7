//! Shared fixture: a miniature but fully valid source tree.
//!
//! Guard floors and cardinalities are scaled down in the fixture manifest
//! so the tree stays small while every guard and rule still has teeth.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use cp12_core::SiteManifest;
use tempfile::TempDir;

pub const MANIFEST_JSON: &str = r##"{
  "manifestVersion": "1.0.0",
  "engineMinVersion": "1.0.0",
  "css": [
    "core/tokens.css",
    "core/responsive.css",
    "features/rooms/rooms.css"
  ],
  "html": [
    {"kind": "fragment", "path": "shell-head.html"},
    {"kind": "literal", "text": "    <main id=\"cp12-main\">"},
    {"kind": "fragment", "path": "features/home/home.html.partial"},
    {"kind": "fragment", "path": "features/rooms/rooms.html.partial"},
    {"kind": "literal", "text": "    </main>"},
    {"kind": "data"},
    {"kind": "fragment", "path": "shell-close.html"}
  ],
  "js": [
    "features/rooms/rooms.js",
    "shared/scroll-reveal.js"
  ],
  "data": {
    "rooms": "data/rooms.json",
    "stringsVi": "data/strings.vi.json",
    "stringsEn": "data/strings.en.json",
    "travel": "data/travel.json",
    "journal": "data/journal.json"
  },
  "guards": {
    "minDocumentKb": 0.3,
    "minStylesheetKb": 0.2,
    "minScriptKb": 0.1
  },
  "expectations": {
    "rooms": 2,
    "travel": 2,
    "travelCategories": ["running", "food"],
    "journal": 2,
    "largeJournalEntries": 1,
    "requiredStringKeys": ["nav.rooms", "hero.title", "hero.subtitle"],
    "sectionIds": ["home", "rooms"]
  }
}"##;

const TOKENS_CSS: &str = r#":root {
  --gold-20: #c9a24b33;
  --pine-dark-90: #0f231ce6;
}
@font-face { font-family: 'Cormorant Garamond'; }
@font-face { font-family: 'Be Vietnam Pro'; }
.btn-base {
  border: 0;
  cursor: pointer;
}
"#;

const RESPONSIVE_CSS: &str = r#"@media (prefers-reduced-motion: reduce) {
  .reveal { animation: none; transition: none; }
}
@media (max-width: 768px) {
  .nav-links { display: none; }
}
"#;

const ROOMS_CSS: &str = r#".rooms-grid {
  display: grid;
  gap: 16px;
}
.room-r1 { background-image: url("static/img/rooms/catalog/jan-01.jpg"); }
"#;

const SHELL_HEAD: &str = r##"<!DOCTYPE html>
<html lang="vi">
<head>
  <meta charset="utf-8">
  <meta name="theme-color" content="#0f231c">
  <meta property="og:image" content="https://cp12.example/og.jpg">
  <meta name="twitter:card" content="summary_large_image">
  <link rel="canonical" href="https://cp12.example/">
  <link rel="stylesheet" href="cp12.css">
  <script src="cp12.js" defer></script>
</head>
<body>"##;

const HOME_PARTIAL: &str = r#"      <section id="home">
        <p data-i18n="hero.tag">Ven sông Sài Gòn</p>
        <h1 data-i18n-html="hero.title">Trạm CP12</h1>
      </section>"#;

const ROOMS_PARTIAL: &str = r#"      <section id="rooms">
        <h2 data-i18n="rooms.heading">Phòng</h2>
        <div id="rooms-grid"></div>
      </section>"#;

const SHELL_CLOSE: &str = "</body>\n</html>";

const ROOMS_JS: &str = r#"(function () {
  "use strict";
  var dataEl = document.getElementById("rooms-data");
  if (!dataEl) return;
  window.cp12Rooms = JSON.parse(dataEl.textContent);
})();"#;

const REVEAL_JS: &str = r#"(function () {
  "use strict";
  try {
    var els = document.querySelectorAll(".reveal");
    els.forEach(function (el) { el.classList.add("visible"); });
  } catch (e) { /* older browsers: leave content visible */ }
})();"#;

pub const ROOMS_JSON: &str = r#"[
  {
    "id": "jan-01",
    "bgClass": "r1",
    "name": "Phong Tram - The Signature Room",
    "name_vi": "Phòng Trạm",
    "price": "580K",
    "featured": true,
    "desc": "Corner room above the river bend.",
    "desc_vi": "Phòng góc nhìn ra khúc sông.",
    "meta": [{"icon": "guest", "text": "2 guests"}],
    "meta_vi": [{"icon": "guest", "text": "2 khách"}],
    "amenities": ["Private Balcony", "WiFi"],
    "amenities_vi": ["Ban Công Riêng", "WiFi"],
    "coverPhoto": "static/img/rooms/catalog/jan-01.jpg",
    "photos": [
      {"src": "static/img/rooms/details/jan-01/door.jpg", "alt": "Door", "alt_vi": "Cửa"}
    ]
  },
  {
    "id": "feb-02",
    "bgClass": "r2",
    "name": "Garden Room",
    "name_vi": "Phòng Vườn",
    "price": "480K",
    "featured": false,
    "desc": "Ground floor, opens to the herb garden.",
    "desc_vi": "Tầng trệt, mở ra vườn rau.",
    "meta": [{"icon": "guest", "text": "2 guests"}],
    "meta_vi": [{"icon": "guest", "text": "2 khách"}],
    "amenities": ["Garden View"],
    "amenities_vi": ["Nhìn Ra Vườn"],
    "photos": []
  }
]"#;

pub const STRINGS_VI: &str = r#"{
  "nav.rooms": "Phòng",
  "hero.title": "Trạm CP12",
  "hero.subtitle": "Nghỉ <em>dưỡng</em><br>bên sông"
}"#;

pub const STRINGS_EN: &str = r#"{
  "nav.rooms": "Rooms",
  "hero.title": "Tram CP12",
  "hero.subtitle": "Rest <em>easy</em><br>by the river"
}"#;

const TRAVEL_JSON: &str = r#"[
  {"bgClass": "t1", "category": "running", "difficulty": "easy", "cat": "Run",
   "name": "River Loop", "distance": "5 km", "duration": "30 min", "highlight": "Sunrise over the bend"},
  {"bgClass": "t2", "category": "food", "difficulty": "easy", "cat": "Eat",
   "name": "Morning Market", "distance": "1 km", "duration": "1 h", "highlight": "Bánh mì stalls"}
]"#;

const JOURNAL_JSON: &str = r##"[
  {"bgClass": "j1", "large": true, "imgLabel": "River at dusk", "cat": "Notes",
   "title": "Why we built by the bend", "excerpt": "The river decides the light.",
   "linkLabel": "Read", "href": "#"},
  {"bgClass": "j2", "large": false, "imgLabel": "Herb garden", "cat": "Notes",
   "title": "The garden kitchen", "excerpt": "Herbs travel ten meters to the table.",
   "linkLabel": "Read", "href": "#"}
]"##;

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Lay down the full fixture tree and load its manifest.
pub fn scaffold() -> (TempDir, SiteManifest) {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "site.manifest.json", MANIFEST_JSON);

    write(root, "src/core/tokens.css", TOKENS_CSS);
    write(root, "src/core/responsive.css", RESPONSIVE_CSS);
    write(root, "src/features/rooms/rooms.css", ROOMS_CSS);

    write(root, "src/shell-head.html", SHELL_HEAD);
    write(root, "src/features/home/home.html.partial", HOME_PARTIAL);
    write(root, "src/features/rooms/rooms.html.partial", ROOMS_PARTIAL);
    write(root, "src/shell-close.html", SHELL_CLOSE);

    write(root, "src/features/rooms/rooms.js", ROOMS_JS);
    write(root, "src/shared/scroll-reveal.js", REVEAL_JS);

    write(root, "src/data/rooms.json", ROOMS_JSON);
    write(root, "src/data/strings.vi.json", STRINGS_VI);
    write(root, "src/data/strings.en.json", STRINGS_EN);
    write(root, "src/data/travel.json", TRAVEL_JSON);
    write(root, "src/data/journal.json", JOURNAL_JSON);

    write(root, "static/img/rooms/catalog/jan-01.jpg", "jpg-bytes");
    write(root, "static/img/rooms/details/jan-01/door.jpg", "jpg-bytes");

    let manifest = SiteManifest::load(&root.join("site.manifest.json")).unwrap();
    (temp, manifest)
}

/// Pull one embedded data payload out of the written document.
pub fn extract_block(document: &str, id: &str) -> Option<String> {
    let marker = format!("<script id=\"{id}\" type=\"application/json\">");
    let start = document.find(&marker)? + marker.len();
    let end = document[start..].find("</script>")? + start;
    Some(document[start..end].trim().to_string())
}
