// Action dispatcher: the backend's CLI command vocabulary as a typed
// enum, client-side pre-validation, and the single choke point that
// sends a command and turns a failed reply into a verbatim server
// message.

use tracing::debug;

use crate::api::Backend;
use crate::error::ClientError;
use crate::model::{BookStatus, Role};

/// Who is asking for a book listing. Users identify themselves by
/// username; librarians by the `--librarian` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    User { username: String },
    Librarian,
}

/// One backend command with its flag/positional convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListBooks(ListScope),
    PickBook { id: u32, username: String },
    AddBook { id: u32, title: String, author: String },
    DeleteBook { id: u32 },
    UpdateBook { id: u32, title: String, author: String },
    ReturnBook { id: u32 },
    ListPicked,
    ApproveBorrow { id: u32 },
    UpdateStatus { id: u32, status: BookStatus },
    RegisterUser { username: String, password: String, role: Role },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListBooks(_) => "list-books",
            Self::PickBook { .. } => "pick-book",
            Self::AddBook { .. } => "add-book",
            Self::DeleteBook { .. } => "delete-book",
            Self::UpdateBook { .. } => "update-book",
            Self::ReturnBook { .. } => "return-book",
            Self::ListPicked => "list-picked",
            Self::ApproveBorrow { .. } => "approve-borrow",
            Self::UpdateStatus { .. } => "update-status",
            Self::RegisterUser { .. } => "register-user",
        }
    }

    /// Render the argument list exactly as the execute endpoint expects
    /// it: add/update/register take leading positionals, everything
    /// else is flag based.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::ListBooks(ListScope::User { username }) => {
                vec!["--username".into(), username.clone()]
            }
            Self::ListBooks(ListScope::Librarian) => vec!["--librarian".into()],
            Self::PickBook { id, username } => vec![
                "--id".into(),
                id.to_string(),
                "--username".into(),
                username.clone(),
            ],
            Self::AddBook { id, title, author } => vec![
                id.to_string(),
                title.clone(),
                author.clone(),
                "--librarian".into(),
            ],
            Self::DeleteBook { id } => {
                vec!["--id".into(), id.to_string(), "--librarian".into()]
            }
            Self::UpdateBook { id, title, author } => vec![
                id.to_string(),
                title.clone(),
                author.clone(),
                "--librarian".into(),
            ],
            Self::ReturnBook { id } => {
                vec!["--id".into(), id.to_string(), "--librarian".into()]
            }
            Self::ListPicked => vec!["--librarian".into()],
            Self::ApproveBorrow { id } => {
                vec!["--id".into(), id.to_string(), "--librarian".into()]
            }
            Self::UpdateStatus { id, status } => vec![
                "--id".into(),
                id.to_string(),
                "--status".into(),
                status.as_str().to_string(),
                "--librarian".into(),
            ],
            Self::RegisterUser {
                username,
                password,
                role,
            } => vec![username.clone(), password.clone(), role.as_str().to_string()],
        }
    }
}

/// Send a command and collapse the reply to success or the server's
/// stderr, verbatim. The caller re-fetches only after an `Ok`.
pub fn dispatch(backend: &dyn Backend, command: &Command) -> Result<(), ClientError> {
    debug!(command = command.name(), "dispatching action");
    let reply = backend.execute(command.name(), &command.args())?;
    if reply.success {
        Ok(())
    } else {
        let message = if reply.stderr.trim().is_empty() {
            "the server rejected the request".to_string()
        } else {
            reply.stderr.trim().to_string()
        };
        Err(ClientError::Rejected(message))
    }
}

/// Book ids are 4 to 10 digits; hyphens and spaces are stripped before
/// checking. Advisory only, the server validates authoritatively.
pub fn validate_book_id(raw: &str) -> Result<u32, ClientError> {
    let cleaned: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if cleaned.is_empty() {
        return Err(ClientError::Invalid("book id cannot be empty".into()));
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Invalid("book id must contain only digits".into()));
    }
    if cleaned.len() < 4 {
        return Err(ClientError::Invalid("book id must be at least 4 digits".into()));
    }
    if cleaned.len() > 10 {
        return Err(ClientError::Invalid("book id must be at most 10 digits".into()));
    }
    cleaned
        .parse()
        .map_err(|_| ClientError::Invalid("book id is out of range".into()))
}

/// Registration passwords are all-digit.
pub fn validate_password(raw: &str) -> Result<(), ClientError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Invalid("password cannot be empty".into()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Invalid("password must contain only digits".into()));
    }
    Ok(())
}

/// Required-field check shared by the form-shaped actions.
pub fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        Err(ClientError::Invalid(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_books_args_by_scope() {
        let user = Command::ListBooks(ListScope::User {
            username: "sara".into(),
        });
        assert_eq!(user.name(), "list-books");
        assert_eq!(user.args(), vec!["--username", "sara"]);

        let lib = Command::ListBooks(ListScope::Librarian);
        assert_eq!(lib.args(), vec!["--librarian"]);
    }

    #[test]
    fn flagged_commands_render_their_conventions() {
        let pick = Command::PickBook {
            id: 1001,
            username: "sara".into(),
        };
        assert_eq!(pick.args(), vec!["--id", "1001", "--username", "sara"]);

        let reject = Command::UpdateStatus {
            id: 1001,
            status: BookStatus::Available,
        };
        assert_eq!(
            reject.args(),
            vec!["--id", "1001", "--status", "Available", "--librarian"]
        );

        let approve = Command::ApproveBorrow { id: 1001 };
        assert_eq!(approve.name(), "approve-borrow");
        assert_eq!(approve.args(), vec!["--id", "1001", "--librarian"]);
    }

    #[test]
    fn positional_commands_lead_with_their_fields() {
        let add = Command::AddBook {
            id: 1001,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
        };
        assert_eq!(add.args(), vec!["1001", "Dune", "Frank Herbert", "--librarian"]);

        let register = Command::RegisterUser {
            username: "sara".into(),
            password: "1234".into(),
            role: Role::User,
        };
        assert_eq!(register.args(), vec!["sara", "1234", "user"]);
    }

    #[test]
    fn book_id_validation_widths() {
        assert!(matches!(validate_book_id("12"), Err(ClientError::Invalid(_))));
        assert!(matches!(validate_book_id("12ab"), Err(ClientError::Invalid(_))));
        assert!(matches!(validate_book_id(""), Err(ClientError::Invalid(_))));
        assert!(matches!(
            validate_book_id("12345678901"),
            Err(ClientError::Invalid(_))
        ));
        assert_eq!(validate_book_id("1001").unwrap(), 1001);
        // Hyphens and spaces are cosmetic.
        assert_eq!(validate_book_id("10-01").unwrap(), 1001);
    }

    #[test]
    fn password_must_be_all_digits() {
        assert!(validate_password("1234").is_ok());
        assert!(matches!(validate_password("12a4"), Err(ClientError::Invalid(_))));
        assert!(matches!(validate_password(""), Err(ClientError::Invalid(_))));
    }
}
