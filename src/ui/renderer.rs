//! Text rendering of page view models.
//!
//! The renderer turns a [`PageViewModel`] into ANSI-styled text, top to
//! bottom: header, search bar, error banner or table, open modal, and the
//! notification stack. It returns a `String` so the caller decides where the
//! frame goes.
//!
//! # Example
//!
//! ```rust,no_run
//! use backoffice::ui::{render, PageViewModel, Theme};
//! # fn frame(vm: &PageViewModel) {
//! print!("{}", render(vm, &Theme::default(), 100));
//! # }
//! ```

use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayRow, ModalInfo, NotificationItem, PageViewModel};
use std::fmt::Write;

/// Renders `vm` into a frame at most `cols` characters wide per table row.
#[must_use]
pub fn render(vm: &PageViewModel, theme: &Theme, cols: usize) -> String {
    let mut out = String::new();

    render_header(&mut out, vm, theme, cols);
    render_search_bar(&mut out, vm, theme);

    if let Some(banner) = &vm.error_banner {
        let _ = writeln!(
            out,
            "{}{}{}  {}({}){}",
            Theme::fg(&theme.colors.error_fg),
            banner.message,
            Theme::reset(),
            Theme::dim(),
            banner.retry_hint,
            Theme::reset()
        );
    } else if vm.loading && vm.rows.is_empty() {
        let _ = writeln!(out, "{}Cargando...{}", Theme::dim(), Theme::reset());
    } else if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "{}{}{}", Theme::dim(), empty.message, Theme::reset());
    } else {
        render_table(&mut out, vm, theme, cols);
    }

    if let Some(modal) = &vm.modal {
        render_modal(&mut out, modal, theme);
    }

    for notification in &vm.notifications {
        render_notification(&mut out, notification, theme);
    }

    let _ = writeln!(
        out,
        "{}{}{}",
        Theme::dim(),
        vm.footer.keybindings,
        Theme::reset()
    );

    out
}

fn render_header(out: &mut String, vm: &PageViewModel, theme: &Theme, cols: usize) {
    let _ = writeln!(
        out,
        "{}{}{} ({}){}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        vm.header.title,
        vm.header.count,
        Theme::reset()
    );
    let _ = writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.border),
        "─".repeat(cols.max(1)),
        Theme::reset()
    );
}

fn render_search_bar(out: &mut String, vm: &PageViewModel, theme: &Theme) {
    let bar = &vm.search_bar;
    if bar.query.is_empty() {
        let _ = writeln!(out, "{}🔍 {}{}", Theme::dim(), bar.placeholder, Theme::reset());
    } else {
        let marker = if bar.pending { " …" } else { "" };
        let _ = writeln!(
            out,
            "🔍 {}{}{}{}",
            bar.query,
            Theme::fg(&theme.colors.text_dim),
            marker,
            Theme::reset()
        );
    }
}

fn render_table(out: &mut String, vm: &PageViewModel, theme: &Theme, cols: usize) {
    if vm.columns.is_empty() {
        return;
    }
    let width = (cols / (vm.columns.len() + 1)).max(6);

    let _ = write!(out, "{}{:>6} ", Theme::bold(), "ID");
    for column in &vm.columns {
        let _ = write!(out, "{} ", pad(column, width));
    }
    let _ = writeln!(out, "{}", Theme::reset());

    for row in &vm.rows {
        render_row(out, row, theme, width);
    }
}

fn render_row(out: &mut String, row: &DisplayRow, theme: &Theme, width: usize) {
    let id = row.id.map(|id| id.to_string()).unwrap_or_default();
    let _ = write!(out, "{id:>6} ");

    for (index, cell) in row.cells.iter().enumerate() {
        let text = truncate(cell, width);
        let ranges = row.highlight_ranges.get(index).map_or(&[][..], Vec::as_slice);
        render_highlighted_text(out, &text, ranges, theme);
        let padding = width.saturating_sub(text.chars().count());
        let _ = write!(out, "{} ", " ".repeat(padding));
    }
    out.push('\n');
}

fn render_modal(out: &mut String, modal: &ModalInfo, theme: &Theme) {
    let _ = writeln!(
        out,
        "{}┌ {} [{}]{}",
        Theme::fg(&theme.colors.border),
        modal.title,
        modal.param,
        Theme::reset()
    );
    if let Some(prompt) = &modal.prompt {
        let _ = writeln!(out, "│ {prompt}");
        let _ = writeln!(out, "│ {}confirm | close{}", Theme::dim(), Theme::reset());
    } else {
        if let Some(record) = &modal.record {
            for line in record.lines() {
                let _ = writeln!(out, "│ {line}");
            }
        }
        let _ = writeln!(out, "│ {}submit <json> | close{}", Theme::dim(), Theme::reset());
    }
    let _ = writeln!(
        out,
        "{}└{}",
        Theme::fg(&theme.colors.border),
        Theme::reset()
    );
}

fn render_notification(out: &mut String, item: &NotificationItem, theme: &Theme) {
    let _ = writeln!(
        out,
        "{}{} {}{} {}[{}]{}",
        Theme::fg(theme.severity_fg(item.severity)),
        item.icon,
        item.message,
        Theme::reset(),
        Theme::dim(),
        item.id,
        Theme::reset()
    );
}

/// Writes `text` with the character ranges in `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices, end exclusive, sorted and
/// non-overlapping. Ranges past the end of `text` are clipped.
fn render_highlighted_text(out: &mut String, text: &str, ranges: &[(usize, usize)], theme: &Theme) {
    if ranges.is_empty() {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());

        current_pos = end;
    }

    if current_pos < chars.len() {
        out.extend(&chars[current_pos..]);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let padding = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(padding))
}
