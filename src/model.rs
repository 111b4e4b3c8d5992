// Core data model shared by the parser, fetcher, renderers and UI.

use serde::{Deserialize, Serialize};

/// The two roles the backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Librarian,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Librarian => "librarian",
        }
    }

    /// Parse the role label the login endpoint returns.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "user" => Some(Self::User),
            "librarian" => Some(Self::Librarian),
            _ => None,
        }
    }
}

/// Lending status of a book. Unrecognized server labels are carried
/// through as `Other` so the renderer can show them verbatim while
/// styling them like a borrowed book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Picked,
    Borrowed,
    Other(String),
}

impl BookStatus {
    /// Decode a status label. An empty or missing label means the book
    /// is available.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "" | "Available" => Self::Available,
            "Picked" => Self::Picked,
            "Borrowed" => Self::Borrowed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Picked => "Picked",
            Self::Borrowed => "Borrowed",
            Self::Other(label) => label,
        }
    }
}

/// One book as the client sees it, whichever fetch path produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub picked_by: Option<String>,
}

impl BookRecord {
    /// Invariant: `picked_by` is set iff the status is Picked or
    /// Borrowed. `Other` statuses are outside the contract and pass.
    pub fn holder_consistent(&self) -> bool {
        match self.status {
            BookStatus::Available => self.picked_by.is_none(),
            BookStatus::Picked | BookStatus::Borrowed => self.picked_by.is_some(),
            BookStatus::Other(_) => true,
        }
    }
}

/// Reduced record from the picked-only listing (no status column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedRecord {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub picked_by: Option<String>,
}

/// Durable session: created on login, read once at startup, destroyed
/// on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub username: String,
}

/// Wire shape of `GET /api/books`. Field names are the backend's
/// snake_case; normalization to `BookRecord` happens on receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiBook {
    pub id: u32,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub picked_by: Option<String>,
}

impl From<ApiBook> for BookRecord {
    fn from(raw: ApiBook) -> Self {
        let status = raw
            .status
            .as_deref()
            .map_or(BookStatus::Available, BookStatus::parse);
        let picked_by = raw
            .picked_by
            .filter(|holder| !holder.is_empty() && holder.as_str() != "-");
        Self {
            id: raw.id,
            title: raw.title,
            author: raw.author,
            status,
            picked_by,
        }
    }
}
