// Renderers: pure functions from records and a filter query to HTML
// fragments, plus the filtering and escaping helpers they share. All
// user-supplied text is escaped before it reaches markup.

use crate::model::{BookRecord, BookStatus, PickedRecord};

/// Escape the five HTML-significant characters in one pass over the
/// text. Each character is mapped exactly once; the output is never
/// re-scanned.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS class for a status badge. Anything unrecognized styles like a
/// borrowed book rather than erroring.
pub fn status_class(status: &BookStatus) -> &'static str {
    match status {
        BookStatus::Available => "status-available",
        BookStatus::Picked => "status-picked",
        BookStatus::Borrowed | BookStatus::Other(_) => "status-borrowed",
    }
}

/// Display label for a status badge. Unrecognized labels show their raw
/// text.
pub fn status_label(status: &BookStatus) -> &str {
    match status {
        BookStatus::Available => "Available",
        BookStatus::Picked => "Reserved",
        BookStatus::Borrowed => "Borrowed",
        BookStatus::Other(label) => label,
    }
}

/// Case-insensitive substring filter against title OR author. An empty
/// or whitespace-only query passes everything through unchanged.
pub fn filter_books(books: &[BookRecord], query: &str) -> Vec<BookRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

fn empty_state(query: &str) -> String {
    let message = if query.trim().is_empty() {
        "No books yet"
    } else {
        "No books match your search"
    };
    format!("<div class=\"empty-state\">{message}</div>")
}

/// Book cards for the user page. Only available books get a reserve
/// button.
pub fn render_book_cards(books: &[BookRecord], query: &str) -> String {
    let filtered = filter_books(books, query);
    if filtered.is_empty() {
        return empty_state(query);
    }
    let mut out = String::new();
    for book in &filtered {
        out.push_str("<div class=\"book-card\">");
        out.push_str(&format!("<h3>{}</h3>", escape(&book.title)));
        out.push_str(&format!("<p class=\"author\">{}</p>", escape(&book.author)));
        out.push_str(&format!(
            "<span class=\"status-badge {}\">{}</span>",
            status_class(&book.status),
            escape(status_label(&book.status)),
        ));
        if book.status == BookStatus::Available {
            out.push_str(&format!(
                "<button type=\"button\" class=\"btn btn-primary btn-sm btn-pick\" data-id=\"{}\">Reserve</button>",
                book.id
            ));
        }
        out.push_str("</div>");
    }
    out
}

/// The librarian's full table with per-row actions. Borrowed books get
/// a return action in addition to edit and delete.
pub fn render_books_table(books: &[BookRecord], query: &str) -> String {
    let filtered = filter_books(books, query);
    if filtered.is_empty() {
        return empty_state(query);
    }
    let mut out = String::from(
        "<table class=\"data-table\"><thead><tr><th>#</th><th>Title</th><th>Author</th>\
         <th>Status</th><th>Held by</th><th>Actions</th></tr></thead><tbody>",
    );
    for book in &filtered {
        let mut actions = format!(
            "<button type=\"button\" class=\"btn btn-primary btn-sm btn-edit\" data-id=\"{id}\">Edit</button> \
             <button type=\"button\" class=\"btn btn-danger btn-sm btn-delete\" data-id=\"{id}\">Delete</button>",
            id = book.id
        );
        if book.status == BookStatus::Borrowed {
            actions.push_str(&format!(
                " <button type=\"button\" class=\"btn btn-success btn-sm btn-return\" data-id=\"{}\">Return</button>",
                book.id
            ));
        }
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td><span class=\"status-badge {}\">{}</span></td>\
             <td>{}</td><td class=\"cell-actions\">{}</td></tr>",
            book.id,
            escape(&book.title),
            escape(&book.author),
            status_class(&book.status),
            escape(status_label(&book.status)),
            escape(book.picked_by.as_deref().unwrap_or("-")),
            actions,
        ));
    }
    out.push_str("</tbody></table>");
    out
}

/// Pending holds with approve/reject actions.
pub fn render_holds_table(picked: &[PickedRecord]) -> String {
    if picked.is_empty() {
        return "<div class=\"empty-state\">No pending holds</div>".to_string();
    }
    let mut out = String::from(
        "<table class=\"data-table\"><thead><tr><th>#</th><th>Title</th><th>Author</th>\
         <th>Held by</th><th>Actions</th></tr></thead><tbody>",
    );
    for book in picked {
        out.push_str(&format!(
            "<tr><td>{id}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"cell-actions\">\
             <button type=\"button\" class=\"btn btn-primary btn-sm btn-approve\" data-id=\"{id}\">Approve</button> \
             <button type=\"button\" class=\"btn btn-danger btn-sm btn-reject\" data-id=\"{id}\">Reject</button>\
             </td></tr>",
            escape(&book.title),
            escape(&book.author),
            escape(book.picked_by.as_deref().unwrap_or("-")),
            id = book.id,
        ));
    }
    out.push_str("</tbody></table>");
    out
}
