// Dual-source data fetch: the structured REST endpoint first, and on
// any failure there, the CLI execute endpoint routed through the
// fixed-width parser. Both paths converge on the same record shape, so
// callers never learn which one ran.

use tracing::debug;

use crate::api::Backend;
use crate::dispatch::{Command, ListScope};
use crate::error::ClientError;
use crate::model::{BookRecord, PickedRecord};
use crate::parse;

/// Outcome of the REST attempt. Modeled as a tag rather than an error
/// so the fallback decision lives in exactly one place.
enum RestOutcome {
    Ok(Vec<BookRecord>),
    NeedsFallback,
}

fn rest_books(backend: &dyn Backend) -> RestOutcome {
    match backend.books() {
        Ok(raw) => RestOutcome::Ok(raw.into_iter().map(BookRecord::from).collect()),
        Err(err) => {
            debug!(%err, "books endpoint failed, taking CLI fallback");
            RestOutcome::NeedsFallback
        }
    }
}

/// Fetch the book listing for the given scope. REST first; otherwise
/// `list-books` through the text-table parser.
pub fn fetch_books(backend: &dyn Backend, scope: &ListScope) -> Result<Vec<BookRecord>, ClientError> {
    match rest_books(backend) {
        RestOutcome::Ok(books) => Ok(books),
        RestOutcome::NeedsFallback => {
            let command = Command::ListBooks(scope.clone());
            let reply = backend.execute(command.name(), &command.args())?;
            if !reply.success {
                let message = if reply.stderr.trim().is_empty() {
                    "could not list books".to_string()
                } else {
                    reply.stderr.trim().to_string()
                };
                return Err(ClientError::Rejected(message));
            }
            Ok(parse::parse_books(&reply.stdout))
        }
    }
}

/// Fetch the pending holds. This listing only exists on the CLI side.
pub fn fetch_picked(backend: &dyn Backend) -> Result<Vec<PickedRecord>, ClientError> {
    let command = Command::ListPicked;
    let reply = backend.execute(command.name(), &command.args())?;
    if !reply.success {
        let message = if reply.stderr.trim().is_empty() {
            "could not list picked books".to_string()
        } else {
            reply.stderr.trim().to_string()
        };
        return Err(ClientError::Rejected(message));
    }
    Ok(parse::parse_picked(&reply.stdout))
}
