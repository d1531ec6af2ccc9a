//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Navigation is only requested here; it takes
//! effect when the main loop calls `App::settle`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use catalog_core::auth::GuardView;
use catalog_core::navigation::Navigation;
use catalog_core::routes::Route;

use crate::app::{
    can_add_email_char, can_add_full_name_char, can_add_password_char, can_add_username_char,
    App, AppState, SignInFocus, SignUpFocus, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Nothing is interactive until the guard renders the screen.
    if app.guard_view() != GuardView::Children {
        return false;
    }

    match app.router.current() {
        Route::SignIn => handle_sign_in_input(app, key),
        Route::SignUp => handle_sign_up_input(app, key),
        _ => handle_shell_input(app, key),
    }
    false
}

fn is_toggle_form_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn handle_sign_in_input(app: &mut App, key: KeyEvent) {
    if is_toggle_form_key(&key) {
        app.navigate(Navigation::push(Route::SignUp));
        return;
    }

    let form = &mut app.sign_in;
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
        }
        KeyCode::Enter => {
            if form.focus == SignInFocus::Username {
                form.focus = SignInFocus::Password;
            } else {
                app.submit_sign_in();
            }
        }
        KeyCode::Backspace => match form.focus {
            SignInFocus::Username => {
                form.username.pop();
            }
            SignInFocus::Password => {
                form.password.pop();
            }
            SignInFocus::Button => {}
        },
        _ => {
            if let Some(c) = is_plain_char(&key) {
                match form.focus {
                    SignInFocus::Username => {
                        if can_add_username_char(form.username.chars().count(), c) {
                            form.username.push(c);
                        }
                    }
                    SignInFocus::Password => {
                        if can_add_password_char(form.password.chars().count(), c) {
                            form.password.push(c);
                        }
                    }
                    SignInFocus::Button => {}
                }
            }
        }
    }
}

fn handle_sign_up_input(app: &mut App, key: KeyEvent) {
    if is_toggle_form_key(&key) || key.code == KeyCode::Esc {
        app.navigate(Navigation::replace(Route::SignIn));
        return;
    }

    let form = &mut app.sign_up;
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
        }
        KeyCode::Enter => {
            if form.focus == SignUpFocus::Button {
                app.submit_sign_up();
            } else {
                form.focus = form.focus.next();
            }
        }
        KeyCode::Backspace => {
            let field = match form.focus {
                SignUpFocus::FullName => Some(&mut form.full_name),
                SignUpFocus::Email => Some(&mut form.email),
                SignUpFocus::Username => Some(&mut form.username),
                SignUpFocus::Password => Some(&mut form.password),
                SignUpFocus::Button => None,
            };
            if let Some(field) = field {
                field.pop();
            }
        }
        _ => {
            if let Some(c) = is_plain_char(&key) {
                let (field, accept): (&mut String, fn(usize, char) -> bool) = match form.focus {
                    SignUpFocus::FullName => (&mut form.full_name, can_add_full_name_char),
                    SignUpFocus::Email => (&mut form.email, can_add_email_char),
                    SignUpFocus::Username => (&mut form.username, can_add_username_char),
                    SignUpFocus::Password => (&mut form.password, can_add_password_char),
                    SignUpFocus::Button => return,
                };
                if accept(field.chars().count(), c) {
                    field.push(c);
                }
            }
        }
    }
}

fn handle_shell_input(app: &mut App, key: KeyEvent) {
    let current = app.router.current();
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('L') => {
            app.request_logout();
        }
        KeyCode::Char('u') => {
            app.refresh_all_background();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(route) = app.shell.route_for_shortcut(c) {
                app.navigate(Navigation::push(route));
            }
        }
        KeyCode::Left => {
            app.navigate(Navigation::push(current.prev()));
        }
        KeyCode::Right => {
            app.navigate(Navigation::push(current.next()));
        }
        KeyCode::Esc | KeyCode::Backspace => {
            app.go_back();
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => {}
    }
}
