// Fixed-width text-table codec for the CLI fallback path.
//
// The column offsets below are a wire format shared with the
// text-producing backend. They must not drift: the parser slices exact
// character columns and the backend pads to exactly these widths.

use std::ops::Range;

use tracing::trace;

use crate::model::{BookRecord, BookStatus, PickedRecord};

// Full listing: ID | Title | Author | Status | Picked By
const FULL_ID: Range<usize> = 0..6;
const FULL_TITLE: Range<usize> = 6..36;
const FULL_AUTHOR: Range<usize> = 36..61;
const FULL_STATUS: Range<usize> = 61..73;
const FULL_PICKED_BY: Range<usize> = 73..88;

// Picked-only listing: ID | Title | Author | Picked By
const PICKED_ID: Range<usize> = 0..6;
const PICKED_TITLE: Range<usize> = 6..36;
const PICKED_AUTHOR: Range<usize> = 36..61;
const PICKED_PICKED_BY: Range<usize> = 61..76;

// The backend clips titles and authors before padding, so an overlong
// field never bleeds into the next column.
const TITLE_CLIP: usize = 28;
const AUTHOR_CLIP: usize = 23;

/// Decode the full book listing. Malformed lines are skipped, never an
/// error: unparseable input yields zero records.
pub fn parse_books(stdout: &str) -> Vec<BookRecord> {
    let mut books = Vec::new();
    for line in stdout.trim().lines() {
        if skip_line(line, "All books") {
            continue;
        }
        let id_raw = column(line, FULL_ID);
        let Some(id) = parse_id(&id_raw) else {
            trace!(line, "skipping non-record line");
            continue;
        };
        books.push(BookRecord {
            id,
            title: non_empty_or_dash(column(line, FULL_TITLE)),
            author: non_empty_or_dash(column(line, FULL_AUTHOR)),
            status: BookStatus::parse(&column(line, FULL_STATUS)),
            picked_by: holder(column(line, FULL_PICKED_BY)),
        });
    }
    books
}

/// Decode the picked-only listing, which carries no status column.
pub fn parse_picked(stdout: &str) -> Vec<PickedRecord> {
    let mut books = Vec::new();
    for line in stdout.trim().lines() {
        if skip_line(line, "Picked books") {
            continue;
        }
        let id_raw = column(line, PICKED_ID);
        let Some(id) = parse_id(&id_raw) else {
            trace!(line, "skipping non-record line");
            continue;
        };
        books.push(PickedRecord {
            id,
            title: non_empty_or_dash(column(line, PICKED_TITLE)),
            author: non_empty_or_dash(column(line, PICKED_AUTHOR)),
            picked_by: holder(column(line, PICKED_PICKED_BY)),
        });
    }
    books
}

/// Re-encode books in the same fixed-width layout the backend emits.
/// The terminal view prints this, and round-trip tests lean on it.
pub fn format_books(books: &[BookRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("All books ({}):\n", books.len()));
    out.push_str(&format!(
        "{:<6}{:<30}{:<25}{:<12}{:<15}\n",
        "ID", "Title", "Author", "Status", "Picked By"
    ));
    out.push_str(&"-".repeat(88));
    out.push('\n');
    for book in books {
        out.push_str(&format!(
            "{:<6}{:<30}{:<25}{:<12}{:<15}\n",
            book.id,
            clip(&book.title, TITLE_CLIP),
            clip(&book.author, AUTHOR_CLIP),
            book.status.as_str(),
            book.picked_by.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Fixed-width encoding of the picked-only listing.
pub fn format_picked(books: &[PickedRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Picked books ({}):\n", books.len()));
    out.push_str(&format!(
        "{:<6}{:<30}{:<25}{:<15}\n",
        "ID", "Title", "Author", "Picked By"
    ));
    out.push_str(&"-".repeat(76));
    out.push('\n');
    for book in books {
        out.push_str(&format!(
            "{:<6}{:<30}{:<25}{:<15}\n",
            book.id,
            clip(&book.title, TITLE_CLIP),
            clip(&book.author, AUTHOR_CLIP),
            book.picked_by.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Blank lines, known header literals and dashed separators are not
/// records.
fn skip_line(line: &str, heading: &str) -> bool {
    line.is_empty()
        || line.starts_with(heading)
        || line.starts_with("ID")
        || line.chars().all(|c| c == '-')
}

/// Slice a character-column range and trim it. Character based rather
/// than byte based so multi-byte titles keep the column grid intact.
fn column(line: &str, range: Range<usize>) -> String {
    line.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect::<String>()
        .trim()
        .to_string()
}

/// A record line must start with one-or-more digits in the ID column.
fn parse_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn non_empty_or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

/// The listing prints `-` for an unheld book.
fn holder(value: String) -> Option<String> {
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

fn clip(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
