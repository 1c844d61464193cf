//! Plain-text tables and status tags for terminal output.

const GAP: &str = "  ";
const MIN_COLUMN: usize = 6;
const RESET: &str = "\u{1b}[0m";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table for string rows.
///
/// A column whose cells are all integers (or `-`) is right-aligned. When the
/// table is wider than `max_width`, the widest columns are capped and their
/// cells end in `…`.
#[must_use]
pub fn render_entity_table<'a>(
    headers: &[&str],
    rows: &'a [Vec<String>],
    options: TableOptions,
) -> String {
    let cell = |row: &'a Vec<String>, index: usize| -> &'a str { row.get(index).map_or("-", String::as_str) };

    let mut widths: Vec<usize> = (0..headers.len())
        .map(|index| {
            rows.iter()
                .map(|row| cell(row, index).chars().count())
                .fold(headers[index].chars().count().max(MIN_COLUMN), usize::max)
        })
        .collect();
    if let Some(max_width) = options.max_width {
        cap_widths(&mut widths, headers, max_width);
    }

    let right_aligned: Vec<bool> = (0..headers.len())
        .map(|index| {
            !rows.is_empty()
                && rows
                    .iter()
                    .all(|row| is_integer_cell(cell(row, index)))
        })
        .collect();

    let header_line = join_cells(headers.iter().zip(&widths).map(|(header, width)| {
        pad(&clip(header, *width), *width, false)
    }));

    let divider = "-".repeat(header_line.chars().count());
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);

    for row in rows {
        lines.push(join_cells(widths.iter().enumerate().map(|(index, width)| {
            let text = clip(cell(row, index), *width);
            let padded = pad(&text, *width, right_aligned[index]);
            if options.color {
                paint(&padded, text.trim())
            } else {
                padded
            }
        })));
    }
    lines.join("\n")
}

/// Lower a common cap on the widest columns until the table fits. A column
/// never shrinks below its header or `MIN_COLUMN`.
fn cap_widths(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    let floors: Vec<usize> = headers
        .iter()
        .map(|header| header.chars().count().max(MIN_COLUMN))
        .collect();
    let fitted = |cap: usize| -> usize {
        widths
            .iter()
            .zip(&floors)
            .map(|(width, floor)| (*width).min(cap.max(*floor)))
            .sum::<usize>()
            + gaps
    };

    let Some(widest) = widths.iter().copied().max() else {
        return;
    };
    if fitted(widest) <= max_width {
        return;
    }

    let mut cap = widest;
    while cap > MIN_COLUMN && fitted(cap) > max_width {
        cap -= 1;
    }
    for (width, floor) in widths.iter_mut().zip(&floors) {
        *width = (*width).min(cap.max(*floor));
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

fn pad(value: &str, width: usize, right: bool) -> String {
    if right {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(GAP).trim_end().to_string()
}

fn is_integer_cell(value: &str) -> bool {
    value == "-" || value.parse::<i64>().is_ok()
}

fn color_code(value: &str) -> Option<&'static str> {
    match value {
        "first_snapshot" | "changed" | "enabled" | "true" => Some("32"),
        "would_save" | "warning" | "disabled" => Some("33"),
        "failed" | "false" => Some("31"),
        _ => None,
    }
}

/// Wrap `text` in the color of `word`, leaving unknown words untouched.
fn paint(text: &str, word: &str) -> String {
    color_code(word).map_or_else(
        || text.to_string(),
        |code| format!("\u{1b}[{code}m{text}{RESET}"),
    )
}

/// Colorize a leading `[outcome]` tag, e.g. `[changed] #3 ...`.
#[must_use]
pub fn colorize_tag(line: &str) -> String {
    line.strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .and_then(|(tag, tail)| color_code(tag).map(|_| paint(&format!("[{tag}]"), tag) + tail))
        .unwrap_or_else(|| line.to_string())
}

#[cfg(test)]
fn strip_ansi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_escape = false;
    for ch in value.chars() {
        match (in_escape, ch) {
            (false, '\u{1b}') => in_escape = true,
            (false, _) => out.push(ch),
            (true, 'm') => in_escape = false,
            (true, _) => {}
        }
    }
    out
}
