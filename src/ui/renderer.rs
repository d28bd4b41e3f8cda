//! Plain-text rendering of view models.
//!
//! Every function returns the rendered text instead of printing it, so the shell
//! decides where output goes and tests can compare strings directly.

use crate::ui::viewmodel::{CatalogViewModel, CityDetail, FavoriteRow};
use std::fmt::Write as _;

const SELECTED_MARKER: &str = ">";
const FAVORITE_MARKER: &str = "*";

/// Renders the numbered search result list.
#[must_use]
pub fn render_results(vm: &CatalogViewModel) -> String {
    if vm.results.is_empty() {
        return "No results. Try `search <city>`.\n".to_string();
    }

    let mut out = String::new();
    for row in &vm.results {
        let _ = writeln!(
            out,
            "{}{:>3}. {} ({}){}",
            if row.is_selected { SELECTED_MARKER } else { " " },
            row.number,
            row.title,
            row.country_code,
            if row.is_favorite { format!(" {FAVORITE_MARKER}") } else { String::new() },
        );
    }
    if let Some(error) = &vm.error {
        let _ = writeln!(out, "Last search failed: {error}");
    }
    out
}

/// Renders the saved-cities list, matched characters wrapped in brackets.
#[must_use]
pub fn render_favorites(vm: &CatalogViewModel) -> String {
    if vm.favorites.is_empty() {
        return if vm.favorites_filter.is_empty() {
            "No favorite cities yet.\n".to_string()
        } else {
            format!("No favorite cities match \"{}\".\n", vm.favorites_filter)
        };
    }

    let mut out = String::new();
    for row in &vm.favorites {
        let _ = writeln!(out, "{FAVORITE_MARKER} {} ({})", highlighted_title(row), row.country_code);
    }
    out
}

/// Renders the detail view of one city.
#[must_use]
pub fn render_detail(detail: &CityDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}",
        detail.name,
        if detail.is_favorite { format!(" {FAVORITE_MARKER}") } else { String::new() }
    );
    if let Some(feature) = &detail.feature {
        let _ = writeln!(out, "{feature}");
    }
    let _ = writeln!(out, "{}", detail.country);
    if let Some(elevation) = &detail.elevation {
        let _ = writeln!(out, "{elevation}");
    }
    if !detail.description.is_empty() {
        let _ = writeln!(out, "\n{}\n", detail.description);
    }
    if !detail.wikipedia_url.is_empty() {
        let _ = writeln!(out, "Wikipedia: {}", detail.wikipedia_url);
    }
    if let Some(thumbnail) = &detail.thumbnail_url {
        let _ = writeln!(out, "Thumbnail: {thumbnail}");
    }
    out
}

fn highlighted_title(row: &FavoriteRow) -> String {
    if row.highlight_ranges.is_empty() {
        return row.title.clone();
    }

    let chars: Vec<char> = row.title.chars().collect();
    let mut out = String::new();
    let mut current_pos = 0;

    for &(start, end) in &row.highlight_ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start > current_pos {
            out.extend(&chars[current_pos..start]);
        }
        out.push('[');
        out.extend(&chars[start..end]);
        out.push(']');
        current_pos = end;
    }

    if current_pos < chars.len() {
        out.extend(&chars[current_pos..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::ResultRow;
    use pretty_assertions::assert_eq;

    fn vm() -> CatalogViewModel {
        CatalogViewModel {
            results: vec![
                ResultRow {
                    number: 1,
                    title: "Paris".to_string(),
                    country_code: "FR".to_string(),
                    is_selected: true,
                    is_favorite: false,
                },
                ResultRow {
                    number: 2,
                    title: "Paris".to_string(),
                    country_code: "US".to_string(),
                    is_selected: false,
                    is_favorite: true,
                },
            ],
            favorites: vec![FavoriteRow {
                title: "New York".to_string(),
                country_code: "US".to_string(),
                highlight_ranges: vec![(0, 3)],
            }],
            favorites_filter: "new".to_string(),
            error: None,
        }
    }

    #[test]
    fn results_show_selection_and_favorite_markers() {
        assert_eq!(render_results(&vm()), ">  1. Paris (FR)\n   2. Paris (US) *\n");
    }

    #[test]
    fn favorites_bracket_matched_characters() {
        assert_eq!(render_favorites(&vm()), "* [New] York (US)\n");
    }

    #[test]
    fn empty_lists_have_hints() {
        let empty = CatalogViewModel {
            results: vec![],
            favorites: vec![],
            favorites_filter: String::new(),
            error: None,
        };
        assert!(render_results(&empty).starts_with("No results"));
        assert_eq!(render_favorites(&empty), "No favorite cities yet.\n");
    }

    #[test]
    fn detail_lists_optional_lines_only_when_present() {
        let detail = CityDetail {
            name: "Oslo".to_string(),
            description: String::new(),
            feature: None,
            country: "Country: NO".to_string(),
            elevation: Some("Elevation: 23 meters".to_string()),
            wikipedia_url: "en.wikipedia.org/wiki/Oslo".to_string(),
            thumbnail_url: None,
            is_favorite: false,
        };

        assert_eq!(
            render_detail(&detail),
            "Oslo\nCountry: NO\nElevation: 23 meters\nWikipedia: en.wikipedia.org/wiki/Oslo\n"
        );
    }
}
