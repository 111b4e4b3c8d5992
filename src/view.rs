// View router: a fixed set of top-level pages, each with named
// sub-views. Exactly one page and exactly one nav item per page are
// active at any time; that exclusivity falls out of modeling the active
// view as a single enum value.

use tracing::debug;

use crate::model::{Role, Session};

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    User,
    Librarian,
}

/// Sub-views of the user page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserView {
    Books,
    Reserved,
}

/// Sub-views of the librarian page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibView {
    Books,
    Holds,
    AddBook,
    RegisterUser,
}

/// Tracks the active page and the active sub-view within each page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    page: Page,
    user_view: UserView,
    lib_view: LibView,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            page: Page::Login,
            user_view: UserView::Books,
            lib_view: LibView::Books,
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state on load: login, unless a persisted session exists,
    /// in which case land directly on the role-appropriate books view
    /// without re-authenticating.
    pub fn startup(session: Option<&Session>) -> Self {
        let mut router = Self::new();
        if let Some(session) = session {
            debug!(username = %session.username, "restoring persisted session");
            router.show_role_page(session.role);
        }
        router
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Deactivate whatever page is showing and activate this one.
    pub fn show_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Activate the books landing view for a role's page.
    pub fn show_role_page(&mut self, role: Role) {
        match role {
            Role::User => {
                self.page = Page::User;
                self.user_view = UserView::Books;
            }
            Role::Librarian => {
                self.page = Page::Librarian;
                self.lib_view = LibView::Books;
            }
        }
    }

    /// Switch sub-views within the user page. Also activates the page,
    /// mirroring nav clicks which always target their own page.
    pub fn show_user_view(&mut self, view: UserView) {
        self.page = Page::User;
        self.user_view = view;
    }

    pub fn show_lib_view(&mut self, view: LibView) {
        self.page = Page::Librarian;
        self.lib_view = view;
    }

    pub fn user_view(&self) -> UserView {
        self.user_view
    }

    pub fn lib_view(&self) -> LibView {
        self.lib_view
    }

    /// The one active nav item for the current page, by stable id.
    pub fn active_nav(&self) -> &'static str {
        match self.page {
            Page::Login => "login",
            Page::User => match self.user_view {
                UserView::Books => "user-books",
                UserView::Reserved => "user-reserved",
            },
            Page::Librarian => match self.lib_view {
                LibView::Books => "lib-books",
                LibView::Holds => "lib-holds",
                LibView::AddBook => "lib-add",
                LibView::RegisterUser => "lib-register",
            },
        }
    }

    /// Display title of the current view.
    pub fn title(&self) -> &'static str {
        match self.page {
            Page::Login => "Sign in",
            Page::User => match self.user_view {
                UserView::Books => "All books",
                UserView::Reserved => "My reserved books",
            },
            Page::Librarian => match self.lib_view {
                LibView::Books => "All books",
                LibView::Holds => "Pending holds",
                LibView::AddBook => "Add a book",
                LibView::RegisterUser => "Register a user",
            },
        }
    }

    /// Terminal action: back to the login page with views reset.
    pub fn logout(&mut self) {
        *self = Self::new();
    }
}
