//! Plain-text table renderer for terminals.

use colored::Colorize;
use itertools::Itertools;

use crate::controller::pagination::PageItem;
use crate::controller::{Frame, SearchMode, SortDirection};

pub const ASC_MARKER: &str = "↓";
pub const DESC_MARKER: &str = "↑";
pub const EMPTY_MESSAGE: &str = "There is no data to display";

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Title,
    Header,
    Active,
    Muted,
    Notice,
}

fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Title => text.bold().green().to_string(),
        Tone::Header => text.bold().to_string(),
        Tone::Active => text.bold().cyan().to_string(),
        Tone::Muted => text.dimmed().to_string(),
        Tone::Notice => text.yellow().to_string(),
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, w: usize) -> String {
    let fill = w.saturating_sub(width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Header label plus the sort controls still available for it. A control is
/// hidden when the table is already sorted that way.
pub fn header_label(frame: &Frame<'_>, index: usize) -> String {
    let Some(header) = frame.headers.get(index) else {
        return String::new();
    };
    let mut label = header.display_name.clone();
    if !frame.sortable || header.display_name.is_empty() {
        return label;
    }
    let field = header.sorting_field_name.as_str();
    let mut markers = String::new();
    if !frame.is_sorted_by(field, SortDirection::Ascending) {
        markers.push_str(ASC_MARKER);
    }
    if !frame.is_sorted_by(field, SortDirection::Descending) {
        markers.push_str(DESC_MARKER);
    }
    if !markers.is_empty() {
        label.push(' ');
        label.push_str(&markers);
    }
    label
}

pub fn render_page_items(items: &[PageItem], color: bool) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Prev { disabled, .. } => {
                paint("‹", if *disabled { Tone::Muted } else { Tone::Header }, color)
            }
            PageItem::Next { disabled, .. } => {
                paint("›", if *disabled { Tone::Muted } else { Tone::Header }, color)
            }
            PageItem::Page { number, active: true } => {
                paint(&format!("[{number}]"), Tone::Active, color)
            }
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Ellipsis => "..".to_string(),
        })
        .join(" ")
}

pub fn render(frame: &Frame<'_>, opts: RenderOptions) -> String {
    let color = opts.color;
    let ncols = frame.headers.len().max(frame.columns.len());

    let labels: Vec<String> = (0..ncols).map(|i| header_label(frame, i)).collect();
    let cells: Vec<Vec<String>> = frame
        .rows
        .iter()
        .map(|r| {
            (0..ncols)
                .map(|i| frame.columns.get(i).map(|c| c.render(r)).unwrap_or_default())
                .collect()
        })
        .collect();
    let widths: Vec<usize> = (0..ncols)
        .map(|i| {
            cells
                .iter()
                .map(|row| width(&row[i]))
                .chain(std::iter::once(width(&labels[i])))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let rule_len = widths.iter().sum::<usize>() + 3 * ncols.saturating_sub(1);
    let rule = "-".repeat(rule_len.max(1));

    let mut out = String::new();

    let mut top: Vec<String> = Vec::new();
    if let Some(title) = frame.title {
        top.push(paint(title, Tone::Title, color));
    }
    match frame.mode {
        SearchMode::FuzzySearching { query } => top.push(format!("search: {query}")),
        SearchMode::FieldFiltering { field, query } => top.push(format!("{field} ~ {query}")),
        SearchMode::Normal => {}
    }
    if let Some(sort) = frame.sort {
        top.push(paint(&sort.to_string(), Tone::Muted, color));
    }
    if !top.is_empty() {
        out.push_str(&top.join("  "));
        out.push('\n');
    }

    let header_line = labels
        .iter()
        .zip(widths.iter())
        .map(|(l, w)| paint(&pad(l, *w), Tone::Header, color))
        .join(" | ");
    out.push_str(header_line.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    if frame.source_is_empty {
        out.push_str(&paint(EMPTY_MESSAGE, Tone::Notice, color));
        out.push('\n');
    }
    for row in cells.iter() {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| pad(c, *w))
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    if let Some(found) = frame.found {
        out.push_str(&format!("{found} item(s) found\n"));
    } else if frame.show_pagination {
        out.push_str(&format!(
            "Show {} items per page   {}\n",
            frame.items_per_page,
            render_page_items(&frame.page_items, color)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::TableController;
    use crate::model::sample_branches;
    use crate::table::TableConfig;

    const PLAIN: RenderOptions = RenderOptions { color: false };

    fn demo() -> TableController {
        TableController::new(TableConfig::branch_demo(), sample_branches()).unwrap()
    }

    #[test]
    fn first_page_renders_rows_and_pager() {
        let t = demo();
        let out = render(&t.frame(), PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Data Branches");
        assert_eq!(lines[1], "Branch ↓↑");
        assert_eq!(lines[3], "master");
        assert_eq!(lines[7], "master1");
        assert_eq!(lines.last(), Some(&"Show 5 items per page   ‹ [1] 2 3 ›"));
    }

    #[test]
    fn active_sort_hides_its_marker() {
        let mut t = demo();
        t.sort_by("branch", SortDirection::Ascending);
        assert_eq!(header_label(&t.frame(), 0), "Branch ↑");
        t.sort_by("branch", SortDirection::Descending);
        assert_eq!(header_label(&t.frame(), 0), "Branch ↓");
    }

    #[test]
    fn searching_shows_found_count_instead_of_pager() {
        let mut t = demo();
        t.search("mast");
        let out = render(&t.frame(), PLAIN);
        assert!(out.contains("search: mast"));
        assert!(out.ends_with("3 item(s) found\n"));
        assert!(!out.contains("items per page"));
    }

    #[test]
    fn empty_source_shows_message() {
        let t = TableController::new(TableConfig::branch_demo(), Vec::new()).unwrap();
        let out = render(&t.frame(), PLAIN);
        assert!(out.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn unsortable_table_has_no_markers() {
        let cfg = TableConfig {
            sort: false,
            ..TableConfig::branch_demo()
        };
        let t = TableController::new(cfg, sample_branches()).unwrap();
        assert_eq!(header_label(&t.frame(), 0), "Branch");
    }
}
