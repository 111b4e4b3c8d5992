// Page controller: owns the view state and drives the
// fetch → state → render cycle. The state arrays here are the single
// source of truth for rendering and filtering; nothing else keeps a
// copy. A re-fetch is only ever issued after a mutating call has
// reported success, and a failed refresh leaves the previous state in
// place.

use tracing::{debug, warn};

use crate::api::Backend;
use crate::dispatch::{self, Command, ListScope};
use crate::error::ClientError;
use crate::fetch;
use crate::model::{BookRecord, BookStatus, PickedRecord, Role, Session};
use crate::session::SessionStore;
use crate::view::Router;

/// In-memory view state for one run of the client. Mutated only by
/// fetch completions and login/logout; never persisted.
#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub all_user_books: Vec<BookRecord>,
    pub all_lib_books: Vec<BookRecord>,
    pub pending_holds: Vec<PickedRecord>,
}

/// Refresh errors that happened after an action already succeeded. The
/// action itself is done; these only mean a list may be stale.
pub type RefreshFailures = Vec<ClientError>;

pub struct Controller<'a> {
    backend: &'a dyn Backend,
    pub state: AppState,
    pub router: Router,
}

impl<'a> Controller<'a> {
    /// Restore from a persisted session (or none) and route to the
    /// matching page.
    pub fn new(backend: &'a dyn Backend, session: Option<Session>) -> Self {
        let router = Router::startup(session.as_ref());
        Self {
            backend,
            state: AppState {
                session,
                ..AppState::default()
            },
            router,
        }
    }

    pub fn username(&self) -> &str {
        self.state
            .session
            .as_ref()
            .map(|s| s.username.as_str())
            .unwrap_or("")
    }

    fn user_scope(&self) -> ListScope {
        ListScope::User {
            username: self.username().to_string(),
        }
    }

    /// Authenticate, persist the session, and route to the role page.
    pub fn login(
        &mut self,
        store: &SessionStore,
        username: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        dispatch::require("username", username)?;
        dispatch::require("password", password)?;

        let reply = self.backend.login(username.trim(), password.trim())?;
        if !reply.success {
            let message = reply
                .message
                .unwrap_or_else(|| "incorrect username or password".to_string());
            return Err(ClientError::Rejected(message));
        }
        let role = reply
            .role
            .as_deref()
            .and_then(Role::from_label)
            .ok_or_else(|| ClientError::Rejected("login reply carried no known role".into()))?;
        let session = Session {
            role,
            username: reply
                .username
                .unwrap_or_else(|| username.trim().to_string()),
        };

        if let Err(err) = store.save(&session) {
            // A session that does not survive a restart is annoying,
            // not fatal.
            warn!(%err, "could not persist session");
        }
        debug!(username = %session.username, role = role.as_str(), "logged in");
        self.state.session = Some(session.clone());
        self.router.show_role_page(role);
        Ok(session)
    }

    /// Clear the durable session and all view state, back to login.
    pub fn logout(&mut self, store: &SessionStore) {
        if let Err(err) = store.clear() {
            warn!(%err, "could not remove session file");
        }
        self.state = AppState::default();
        self.router.logout();
    }

    pub fn refresh_user_books(&mut self) -> Result<(), ClientError> {
        let books = fetch::fetch_books(self.backend, &self.user_scope())?;
        self.state.all_user_books = books;
        Ok(())
    }

    pub fn refresh_lib_books(&mut self) -> Result<(), ClientError> {
        let books = fetch::fetch_books(self.backend, &ListScope::Librarian)?;
        self.state.all_lib_books = books;
        Ok(())
    }

    pub fn refresh_holds(&mut self) -> Result<(), ClientError> {
        let holds = fetch::fetch_picked(self.backend)?;
        self.state.pending_holds = holds;
        Ok(())
    }

    /// The user's own reserved books, derived from the full listing.
    pub fn my_reserved(&self) -> Vec<BookRecord> {
        let username = self.username();
        self.state
            .all_user_books
            .iter()
            .filter(|b| b.picked_by.as_deref() == Some(username))
            .cloned()
            .collect()
    }

    fn run_action(
        &mut self,
        command: Command,
        refreshes: &[Refresh],
    ) -> Result<RefreshFailures, ClientError> {
        dispatch::dispatch(self.backend, &command)?;
        // The mutation succeeded; now bring each affected list up to
        // date. The refreshes are independent so one failing does not
        // stop, or blank out, the others.
        let mut failures = Vec::new();
        for refresh in refreshes {
            let result = match refresh {
                Refresh::UserBooks => self.refresh_user_books(),
                Refresh::LibBooks => self.refresh_lib_books(),
                Refresh::Holds => self.refresh_holds(),
            };
            if let Err(err) = result {
                warn!(%err, "refresh after action failed");
                failures.push(err);
            }
        }
        Ok(failures)
    }

    /// Reserve a book as the current user.
    pub fn pick_book(&mut self, id_raw: &str) -> Result<RefreshFailures, ClientError> {
        let id = dispatch::validate_book_id(id_raw)?;
        let command = Command::PickBook {
            id,
            username: self.username().to_string(),
        };
        self.run_action(command, &[Refresh::UserBooks])
    }

    pub fn add_book(
        &mut self,
        id_raw: &str,
        title: &str,
        author: &str,
    ) -> Result<RefreshFailures, ClientError> {
        dispatch::require("title", title)?;
        dispatch::require("author", author)?;
        let id = dispatch::validate_book_id(id_raw)?;
        let command = Command::AddBook {
            id,
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        };
        self.run_action(command, &[Refresh::LibBooks])
    }

    pub fn update_book(
        &mut self,
        id_raw: &str,
        title: &str,
        author: &str,
    ) -> Result<RefreshFailures, ClientError> {
        dispatch::require("title", title)?;
        dispatch::require("author", author)?;
        let id = dispatch::validate_book_id(id_raw)?;
        let command = Command::UpdateBook {
            id,
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        };
        self.run_action(command, &[Refresh::LibBooks])
    }

    pub fn delete_book(&mut self, id_raw: &str) -> Result<RefreshFailures, ClientError> {
        let id = dispatch::validate_book_id(id_raw)?;
        self.run_action(Command::DeleteBook { id }, &[Refresh::LibBooks])
    }

    /// Return a borrowed book to the shelf. Affects both listings.
    pub fn return_book(&mut self, id_raw: &str) -> Result<RefreshFailures, ClientError> {
        let id = dispatch::validate_book_id(id_raw)?;
        self.run_action(
            Command::ReturnBook { id },
            &[Refresh::LibBooks, Refresh::Holds],
        )
    }

    /// Approve a hold, turning it into a borrow. Both the book list and
    /// the holds list change server-side, so both are re-fetched.
    pub fn approve_hold(&mut self, id_raw: &str) -> Result<RefreshFailures, ClientError> {
        let id = dispatch::validate_book_id(id_raw)?;
        self.run_action(
            Command::ApproveBorrow { id },
            &[Refresh::LibBooks, Refresh::Holds],
        )
    }

    /// Reject a hold, returning the book to available.
    pub fn reject_hold(&mut self, id_raw: &str) -> Result<RefreshFailures, ClientError> {
        let id = dispatch::validate_book_id(id_raw)?;
        let command = Command::UpdateStatus {
            id,
            status: BookStatus::Available,
        };
        self.run_action(command, &[Refresh::LibBooks, Refresh::Holds])
    }

    pub fn register_user(
        &mut self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<RefreshFailures, ClientError> {
        dispatch::require("username", username)?;
        dispatch::validate_password(password)?;
        let command = Command::RegisterUser {
            username: username.trim().to_string(),
            password: password.trim().to_string(),
            role,
        };
        self.run_action(command, &[])
    }
}

#[derive(Clone, Copy)]
enum Refresh {
    UserBooks,
    LibBooks,
    Holds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiBook, BookStatus};
    use crate::test_support::FakeBackend;
    use crate::view::Page;

    fn api_book(id: u32, title: &str, status: &str, picked_by: Option<&str>) -> ApiBook {
        ApiBook {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            status: Some(status.to_string()),
            picked_by: picked_by.map(str::to_string),
        }
    }

    fn holds_stdout(id: u32, title: &str, holder: &str) -> String {
        format!("{id:<6}{title:<30}{:<25}{holder:<15}\n", "Author")
    }

    fn librarian_session() -> Session {
        Session {
            role: Role::Librarian,
            username: "amina".to_string(),
        }
    }

    #[test]
    fn login_success_persists_session_and_routes() {
        let backend = FakeBackend::new();
        backend.push_login_ok("user", "sara");
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session"));

        let mut controller = Controller::new(&backend, None);
        assert_eq!(controller.router.page(), Page::Login);

        let session = controller.login(&store, "sara", "1234").unwrap();
        assert_eq!(session.role, Role::User);
        assert_eq!(controller.router.page(), Page::User);
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn login_rejection_is_verbatim_and_leaves_no_session() {
        let backend = FakeBackend::new();
        backend.push_login_rejected("Incorrect username or password");
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session"));

        let mut controller = Controller::new(&backend, None);
        let err = controller.login(&store, "sara", "9999").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect username or password");
        assert!(controller.state.session.is_none());
        assert_eq!(controller.router.page(), Page::Login);
        assert!(store.load().is_none());
    }

    #[test]
    fn blank_credentials_never_reach_the_backend() {
        let backend = FakeBackend::new();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session"));

        let mut controller = Controller::new(&backend, None);
        let err = controller.login(&store, "  ", "1234").unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
    }

    #[test]
    fn logout_clears_state_store_and_routing() {
        let backend = FakeBackend::new();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session"));
        store.save(&librarian_session()).unwrap();

        let mut controller = Controller::new(&backend, Some(librarian_session()));
        assert_eq!(controller.router.page(), Page::Librarian);

        controller.logout(&store);
        assert_eq!(controller.router.page(), Page::Login);
        assert!(controller.state.session.is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn my_reserved_filters_by_current_username() {
        let backend = FakeBackend::new();
        backend.push_books(Ok(vec![
            api_book(1001, "Dune", "Picked", Some("sara")),
            api_book(1002, "Emma", "Picked", Some("omar")),
            api_book(1003, "Ivanhoe", "Available", None),
        ]));
        let mut controller = Controller::new(
            &backend,
            Some(Session {
                role: Role::User,
                username: "sara".to_string(),
            }),
        );
        controller.refresh_user_books().unwrap();
        let reserved = controller.my_reserved();
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].id, 1001);
    }

    #[test]
    fn short_book_id_is_rejected_before_any_network_call() {
        let backend = FakeBackend::new();
        let mut controller = Controller::new(&backend, Some(librarian_session()));

        let err = controller.add_book("12", "Dune", "Frank Herbert").unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        assert!(backend.executed().is_empty());
    }

    #[test]
    fn failed_action_leaves_state_untouched_and_skips_refetch() {
        let backend = FakeBackend::new();
        backend.push_books(Ok(vec![api_book(1001, "Dune", "Available", None)]));
        let mut controller = Controller::new(
            &backend,
            Some(Session {
                role: Role::User,
                username: "sara".to_string(),
            }),
        );
        controller.refresh_user_books().unwrap();
        let before = controller.state.all_user_books.clone();

        backend.push_exec_fail("ERROR: Book 1001 is already picked");
        let err = controller.pick_book("1001").unwrap_err();
        assert_eq!(err.to_string(), "ERROR: Book 1001 is already picked");
        assert_eq!(controller.state.all_user_books, before);
        // Only the failed mutation went out; no re-fetch followed it.
        assert_eq!(backend.executed().len(), 1);
    }

    #[test]
    fn approving_a_hold_refreshes_books_and_holds() {
        let backend = FakeBackend::new();
        let mut controller = Controller::new(&backend, Some(librarian_session()));

        backend.push_exec_ok(""); // approve-borrow
        backend.push_books(Ok(vec![api_book(1001, "Dune", "Borrowed", Some("sara"))]));
        backend.push_exec_ok(""); // list-picked, now empty

        let failures = controller.approve_hold("1001").unwrap();
        assert!(failures.is_empty());

        let calls = backend.executed();
        assert_eq!(calls[0].0, "approve-borrow");
        assert_eq!(calls[0].1, vec!["--id", "1001", "--librarian"]);
        assert_eq!(calls[1].0, "list-picked");

        assert_eq!(controller.state.all_lib_books.len(), 1);
        assert_eq!(controller.state.all_lib_books[0].status, BookStatus::Borrowed);
        assert!(controller.state.pending_holds.is_empty());
    }

    #[test]
    fn failed_refresh_does_not_blank_the_other_list() {
        let backend = FakeBackend::new();
        let mut controller = Controller::new(&backend, Some(librarian_session()));

        // Seed both lists.
        backend.push_books(Ok(vec![api_book(1001, "Dune", "Picked", Some("sara"))]));
        controller.refresh_lib_books().unwrap();
        backend.push_exec_ok(&holds_stdout(1001, "Dune", "sara"));
        controller.refresh_holds().unwrap();
        let books_before = controller.state.all_lib_books.clone();

        // Approve succeeds, the book-list refresh fails on both paths,
        // the holds refresh succeeds.
        backend.push_exec_ok(""); // approve-borrow
        backend.push_books(Err(ClientError::Connectivity("down".into())));
        backend.push_exec_fail("ERROR: list-books unavailable"); // fallback fails too
        backend.push_exec_ok(""); // list-picked, now empty

        let failures = controller.approve_hold("1001").unwrap();
        assert_eq!(failures.len(), 1);
        // The stale book list is retained, not blanked.
        assert_eq!(controller.state.all_lib_books, books_before);
        assert!(controller.state.pending_holds.is_empty());
    }

    #[test]
    fn reject_hold_issues_update_status_available() {
        let backend = FakeBackend::new();
        let mut controller = Controller::new(&backend, Some(librarian_session()));

        backend.push_exec_ok(""); // update-status
        backend.push_books(Ok(vec![api_book(1001, "Dune", "Available", None)]));
        backend.push_exec_ok(""); // list-picked

        controller.reject_hold("1001").unwrap();
        let calls = backend.executed();
        assert_eq!(calls[0].0, "update-status");
        assert_eq!(
            calls[0].1,
            vec!["--id", "1001", "--status", "Available", "--librarian"]
        );
    }

    #[test]
    fn register_user_validates_digit_password() {
        let backend = FakeBackend::new();
        let mut controller = Controller::new(&backend, Some(librarian_session()));

        let err = controller
            .register_user("sara", "not-digits", Role::User)
            .unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        assert!(backend.executed().is_empty());

        backend.push_exec_ok("");
        let failures = controller.register_user("sara", "1234", Role::User).unwrap();
        assert!(failures.is_empty());
        assert_eq!(backend.executed()[0].1, vec!["sara", "1234", "user"]);
    }
}
