//! URL slug derivation from display names.
//!
//! `base_slug` produces the starting candidate; uniqueness against the
//! store is handled by `Repository::generate_unique_slug`, which probes
//! and appends numeric suffixes on collision.

/// Known non-Latin display names with stable English slugs.
///
/// Catalog entries carried over from the original data set; names that
/// normalize to nothing (Chinese titles mostly) map here before the
/// timestamp placeholder kicks in.
const FALLBACK_SLUGS: &[(&str, &str)] = &[
    ("超级马里奥", "super-mario"),
    ("俄罗斯方块", "tetris"),
    ("贪吃蛇", "snake"),
    ("打砖块", "breakout"),
    ("太空射击", "space-shooter"),
    ("连连看", "mahjong-connect"),
    ("推箱子", "sokoban"),
    ("扫雷", "minesweeper"),
];

/// Normalize a display name into a URL-safe slug.
///
/// Lowercases, strips everything outside ASCII alphanumerics, and
/// collapses runs of whitespace/underscores/hyphens into single
/// hyphens with no leading or trailing separator. Non-Latin input can
/// normalize to the empty string.
pub fn slug_from_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;

    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        }
        // everything else is stripped outright
    }

    out
}

/// Derive the base slug for a name, applying fallbacks for names that
/// normalize below two characters: first the fixed lookup table, then
/// a timestamp placeholder.
pub fn base_slug(name: &str, now_ms: i64) -> String {
    let slug = slug_from_name(name);
    if slug.len() >= 2 {
        return slug;
    }

    for (display, mapped) in FALLBACK_SLUGS {
        if *display == name {
            return (*mapped).to_string();
        }
    }

    format!("game-{}", now_ms)
}
