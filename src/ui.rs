// UI layer: interactive terminal menus built on `dialoguer`. Each menu
// iteration reads input, runs the matching controller action to
// completion, and repaints, so the flow stays easy to follow.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::ApiClient;
use crate::controller::{Controller, RefreshFailures};
use crate::error::ClientError;
use crate::model::Role;
use crate::parse;
use crate::render;
use crate::session::SessionStore;
use crate::view::{LibView, Page, UserView};

/// Run the client until the user exits. Restores a persisted session
/// first so a returning user lands straight on their books view.
pub fn run(api: &ApiClient, store: &SessionStore) -> Result<()> {
    let session = store.load();
    let mut controller = Controller::new(api, session);

    loop {
        match controller.router.page() {
            Page::Login => {
                if !login_page(&mut controller, store)? {
                    return Ok(());
                }
            }
            Page::User => user_page(&mut controller, store)?,
            Page::Librarian => librarian_page(&mut controller, store)?,
        }
    }
}

/// Spinner shown while a network call is in flight.
fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    bar.set_message(message.to_string());
    bar
}

/// Print a failure the way the error taxonomy asks: connectivity as a
/// generic notice, everything else verbatim.
fn notify_error(err: &ClientError) {
    if err.is_connectivity() {
        println!("Could not reach the library server. Make sure it is running.");
    } else {
        println!("{err}");
    }
}

fn notify_refresh_failures(failures: &RefreshFailures) {
    for err in failures {
        notify_error(err);
    }
}

/// Returns false when the user chooses to exit the program.
fn login_page(controller: &mut Controller, store: &SessionStore) -> Result<bool> {
    let items = vec!["Sign in", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    if selection == 1 {
        return Ok(false);
    }

    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let bar = spinner("Signing in...");
    let outcome = controller.login(store, &username, &password);
    bar.finish_and_clear();

    match outcome {
        Ok(session) => println!("Welcome, {}!", session.username),
        Err(err) => notify_error(&err),
    }
    Ok(true)
}

fn user_page(controller: &mut Controller, store: &SessionStore) -> Result<()> {
    while controller.router.page() == Page::User {
        let items = vec![
            "All books",
            "My reserved books",
            "Export current view as HTML",
            "Log out",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                controller.router.show_user_view(UserView::Books);
                user_books_view(controller)?;
            }
            1 => {
                controller.router.show_user_view(UserView::Reserved);
                user_reserved_view(controller)?;
            }
            2 => export_view(controller)?,
            3 => {
                controller.logout(store);
                println!("Logged out.");
            }
            _ => {}
        }
    }
    Ok(())
}

fn user_books_view(controller: &mut Controller) -> Result<()> {
    let bar = spinner("Loading books...");
    let refreshed = controller.refresh_user_books();
    bar.finish_and_clear();
    if let Err(err) = refreshed {
        notify_error(&err);
        return Ok(());
    }

    let query: String = Input::new()
        .with_prompt("Filter by title or author (leave empty for all)")
        .allow_empty(true)
        .interact_text()?;
    let books = render::filter_books(&controller.state.all_user_books, &query);
    if books.is_empty() {
        println!("{}", empty_message(&query));
        return Ok(());
    }
    print!("{}", parse::format_books(&books));

    let id: String = Input::new()
        .with_prompt("Book id to reserve (leave empty to go back)")
        .allow_empty(true)
        .interact_text()?;
    if id.trim().is_empty() {
        return Ok(());
    }
    let bar = spinner("Reserving...");
    let outcome = controller.pick_book(&id);
    bar.finish_and_clear();
    match outcome {
        Ok(failures) => {
            println!("Book reserved. A librarian still has to approve it.");
            notify_refresh_failures(&failures);
        }
        Err(err) => notify_error(&err),
    }
    Ok(())
}

fn user_reserved_view(controller: &mut Controller) -> Result<()> {
    let bar = spinner("Loading your reservations...");
    let refreshed = controller.refresh_user_books();
    bar.finish_and_clear();
    if let Err(err) = refreshed {
        notify_error(&err);
        return Ok(());
    }

    let reserved = controller.my_reserved();
    if reserved.is_empty() {
        println!("You have no reserved books.");
    } else {
        print!("{}", parse::format_books(&reserved));
    }
    Ok(())
}

fn librarian_page(controller: &mut Controller, store: &SessionStore) -> Result<()> {
    while controller.router.page() == Page::Librarian {
        let items = vec![
            "All books",
            "Pending holds",
            "Add a book",
            "Register a user",
            "Export current view as HTML",
            "Log out",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                controller.router.show_lib_view(LibView::Books);
                lib_books_view(controller)?;
            }
            1 => {
                controller.router.show_lib_view(LibView::Holds);
                lib_holds_view(controller)?;
            }
            2 => {
                controller.router.show_lib_view(LibView::AddBook);
                lib_add_book(controller)?;
            }
            3 => {
                controller.router.show_lib_view(LibView::RegisterUser);
                lib_register_user(controller)?;
            }
            4 => export_view(controller)?,
            5 => {
                controller.logout(store);
                println!("Logged out.");
            }
            _ => {}
        }
    }
    Ok(())
}

fn lib_books_view(controller: &mut Controller) -> Result<()> {
    let bar = spinner("Loading books...");
    let refreshed = controller.refresh_lib_books();
    bar.finish_and_clear();
    if let Err(err) = refreshed {
        notify_error(&err);
        return Ok(());
    }

    let query: String = Input::new()
        .with_prompt("Filter by title or author (leave empty for all)")
        .allow_empty(true)
        .interact_text()?;
    let books = render::filter_books(&controller.state.all_lib_books, &query);
    if books.is_empty() {
        println!("{}", empty_message(&query));
        return Ok(());
    }
    print!("{}", parse::format_books(&books));

    let actions = vec!["Edit a book", "Delete a book", "Return a book", "Back"];
    let action = Select::new().items(&actions).default(3).interact()?;
    match action {
        0 => {
            let id: String = Input::new().with_prompt("Book id").interact_text()?;
            let title: String = Input::new().with_prompt("New title").interact_text()?;
            let author: String = Input::new().with_prompt("New author").interact_text()?;
            run_with_spinner("Updating...", || controller.update_book(&id, &title, &author));
        }
        1 => {
            let id: String = Input::new().with_prompt("Book id").interact_text()?;
            let sure = Confirm::new()
                .with_prompt(format!("Delete book {}?", id.trim()))
                .interact()?;
            if sure {
                run_with_spinner("Deleting...", || controller.delete_book(&id));
            }
        }
        2 => {
            let id: String = Input::new().with_prompt("Book id").interact_text()?;
            run_with_spinner("Returning...", || controller.return_book(&id));
        }
        _ => {}
    }
    Ok(())
}

fn lib_holds_view(controller: &mut Controller) -> Result<()> {
    let bar = spinner("Loading pending holds...");
    let refreshed = controller.refresh_holds();
    bar.finish_and_clear();
    if let Err(err) = refreshed {
        notify_error(&err);
        return Ok(());
    }

    if controller.state.pending_holds.is_empty() {
        println!("No pending holds.");
        return Ok(());
    }
    print!("{}", parse::format_picked(&controller.state.pending_holds));

    let actions = vec!["Approve a hold", "Reject a hold", "Back"];
    let action = Select::new().items(&actions).default(2).interact()?;
    match action {
        0 => {
            let id: String = Input::new().with_prompt("Book id").interact_text()?;
            run_with_spinner("Approving...", || controller.approve_hold(&id));
        }
        1 => {
            let id: String = Input::new().with_prompt("Book id").interact_text()?;
            run_with_spinner("Rejecting...", || controller.reject_hold(&id));
        }
        _ => {}
    }
    Ok(())
}

fn lib_add_book(controller: &mut Controller) -> Result<()> {
    let id: String = Input::new().with_prompt("Book id (4-10 digits)").interact_text()?;
    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let author: String = Input::new().with_prompt("Author").interact_text()?;
    run_with_spinner("Adding...", || controller.add_book(&id, &title, &author));
    Ok(())
}

fn lib_register_user(controller: &mut Controller) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password: String = Password::new()
        .with_prompt("Password (digits only)")
        .interact()?;
    let roles = vec!["user", "librarian"];
    let role = match Select::new().items(&roles).default(0).interact()? {
        1 => Role::Librarian,
        _ => Role::User,
    };
    run_with_spinner("Registering...", || {
        controller.register_user(&username, &password, role)
    });
    Ok(())
}

/// Write the markup rendering of the current view to a file, so the
/// same data the terminal shows can be inspected as a page.
fn export_view(controller: &Controller) -> Result<()> {
    let markup = match controller.router.page() {
        Page::User => match controller.router.user_view() {
            UserView::Books => render::render_book_cards(&controller.state.all_user_books, ""),
            UserView::Reserved => render::render_book_cards(&controller.my_reserved(), ""),
        },
        Page::Librarian => match controller.router.lib_view() {
            LibView::Holds => render::render_holds_table(&controller.state.pending_holds),
            _ => render::render_books_table(&controller.state.all_lib_books, ""),
        },
        Page::Login => String::new(),
    };
    if markup.is_empty() {
        println!("Nothing to export yet; open a view first.");
        return Ok(());
    }

    let path: String = Input::new()
        .with_prompt("Write HTML to")
        .default("libshelf-view.html".to_string())
        .interact_text()?;
    std::fs::write(path.trim(), markup)?;
    println!("Exported {}.", controller.router.title());
    Ok(())
}

fn empty_message(query: &str) -> &'static str {
    if query.trim().is_empty() {
        "No books yet."
    } else {
        "No books match your search."
    }
}

/// Run one controller action behind a spinner and report the outcome.
fn run_with_spinner<F>(message: &str, action: F)
where
    F: FnOnce() -> Result<RefreshFailures, ClientError>,
{
    let bar = spinner(message);
    let outcome = action();
    bar.finish_and_clear();
    match outcome {
        Ok(failures) => {
            println!("Done.");
            notify_refresh_failures(&failures);
        }
        Err(err) => notify_error(&err),
    }
}
