//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_text_char, App, AppState, BookingFocus,
    BookingForm, BookingStep, Focus, LoginFocus, PaymentFocus, PaymentForm, RegisterFocus,
    ReviewForm, Tab, PAGE_SCROLL_SIZE,
};
use crate::models::{PaymentStatus, ReservationSortColumn, ReservationStatus, ResourceSortColumn};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Overlay states swallow all input
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::Registering => return handle_register_input(app, key).await,
        AppState::Booking => {
            handle_booking_input(app, key);
            return Ok(false);
        }
        AppState::Paying => {
            handle_payment_input(app, key);
            return Ok(false);
        }
        AppState::Reviewing => {
            handle_review_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Searching => return handle_search_input(app, key),
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Resources;
            app.focus = Focus::List;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Reservations;
            app.focus = Focus::List;
        }
        KeyCode::Char('3') => {
            app.current_tab = Tab::Notifications;
            app.focus = Focus::List;
        }
        KeyCode::Char('4') => {
            app.current_tab = Tab::Account;
            app.focus = Focus::List;
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
            app.focus = Focus::List;
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
            app.focus = Focus::List;
        }
        KeyCode::Char('u') => {
            app.refresh_all_background();
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.focus = Focus::List;
        }
        _ => {
            // Tab-specific input
            match app.current_tab {
                Tab::Resources => handle_resources_input(app, key),
                Tab::Reservations => handle_reservations_input(app, key),
                Tab::Notifications => handle_notifications_input(app, key),
                Tab::Account => handle_account_input(app, key),
            }
        }
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // Keep search query active
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            // Reset selections when the filter changes
            app.resource_selection = 0;
            app.reservation_selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+R switches to the registration form
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        app.start_register();
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => {
            match app.login_focus {
                LoginFocus::Email => {
                    app.login_focus = LoginFocus::Password;
                }
                LoginFocus::Password => {
                    app.login_focus = LoginFocus::Button;
                }
                LoginFocus::Button => {
                    // On success the state drops back to Normal
                    let _ = app.attempt_login().await;
                    if app.state == AppState::Normal {
                        app.refresh_all_background();
                    }
                }
            }
        }
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.start_login();
        }
        KeyCode::Down | KeyCode::Tab => {
            app.register_focus = app.register_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.register_focus = app.register_focus.prev();
        }
        KeyCode::Enter => match app.register_focus {
            RegisterFocus::Button => {
                // On success this drops back to the login overlay
                let _ = app.attempt_register().await;
            }
            RegisterFocus::Terms => {
                app.register_form.terms_accepted = !app.register_form.terms_accepted;
            }
            _ => {
                app.register_focus = app.register_focus.next();
            }
        },
        KeyCode::Backspace => {
            let form = &mut app.register_form;
            match app.register_focus {
                RegisterFocus::FirstName => {
                    form.first_name.pop();
                }
                RegisterFocus::LastName => {
                    form.last_name.pop();
                }
                RegisterFocus::Email => {
                    form.email.pop();
                }
                RegisterFocus::Password => {
                    form.password.pop();
                }
                RegisterFocus::ConfirmPassword => {
                    form.confirm_password.pop();
                }
                RegisterFocus::Phone => {
                    form.phone_number.pop();
                }
                RegisterFocus::Terms | RegisterFocus::Button => {}
            }
        }
        KeyCode::Char(c) => {
            let form = &mut app.register_form;
            match app.register_focus {
                RegisterFocus::FirstName => {
                    if can_add_text_char(form.first_name.len(), c) {
                        form.first_name.push(c);
                    }
                }
                RegisterFocus::LastName => {
                    if can_add_text_char(form.last_name.len(), c) {
                        form.last_name.push(c);
                    }
                }
                RegisterFocus::Email => {
                    if can_add_email_char(form.email.len(), c) {
                        form.email.push(c);
                    }
                }
                RegisterFocus::Password => {
                    if can_add_password_char(form.password.len(), c) {
                        form.password.push(c);
                    }
                }
                RegisterFocus::ConfirmPassword => {
                    if can_add_password_char(form.confirm_password.len(), c) {
                        form.confirm_password.push(c);
                    }
                }
                RegisterFocus::Phone => {
                    if can_add_text_char(form.phone_number.len(), c) {
                        form.phone_number.push(c);
                    }
                }
                RegisterFocus::Terms => {
                    if c == ' ' {
                        form.terms_accepted = !form.terms_accepted;
                    }
                }
                RegisterFocus::Button => {}
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Field cycle for the booking wizard's current step
fn booking_focus_cycle(form: &BookingForm) -> &'static [BookingFocus] {
    match form.step {
        BookingStep::Times => &[BookingFocus::Start, BookingFocus::End],
        BookingStep::Details => {
            if form.is_recurring {
                &[
                    BookingFocus::Attendees,
                    BookingFocus::Description,
                    BookingFocus::Recurring,
                    BookingFocus::Pattern,
                    BookingFocus::Interval,
                    BookingFocus::EndDate,
                ]
            } else {
                &[
                    BookingFocus::Attendees,
                    BookingFocus::Description,
                    BookingFocus::Recurring,
                ]
            }
        }
        BookingStep::Confirm => &[],
    }
}

fn booking_move_focus(form: &mut BookingForm, forward: bool) {
    let cycle = booking_focus_cycle(form);
    if cycle.is_empty() {
        return;
    }
    let pos = cycle.iter().position(|f| *f == form.focus).unwrap_or(0);
    let next = if forward {
        (pos + 1) % cycle.len()
    } else {
        (pos + cycle.len() - 1) % cycle.len()
    };
    form.focus = cycle[next];
}

fn handle_booking_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.booking_form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    if form.submitting {
        return;
    }

    match key.code {
        KeyCode::Esc => match form.step {
            BookingStep::Times => {
                app.booking_form = None;
                app.state = AppState::Normal;
            }
            BookingStep::Details => {
                form.step = BookingStep::Times;
                form.focus = BookingFocus::Start;
            }
            BookingStep::Confirm => {
                form.step = BookingStep::Details;
                form.focus = BookingFocus::Attendees;
            }
        },
        KeyCode::Down | KeyCode::Tab => booking_move_focus(form, true),
        KeyCode::Up | KeyCode::BackTab => booking_move_focus(form, false),
        KeyCode::Enter => match form.step {
            BookingStep::Times => {
                if form.validate() {
                    form.step = BookingStep::Details;
                    form.focus = BookingFocus::Attendees;
                }
            }
            BookingStep::Details => {
                if form.validate() {
                    form.step = BookingStep::Confirm;
                }
            }
            BookingStep::Confirm => {
                if form.validate() {
                    app.submit_booking();
                }
            }
        },
        KeyCode::Backspace => match form.focus {
            BookingFocus::Start => {
                form.start.pop();
            }
            BookingFocus::End => {
                form.end.pop();
            }
            BookingFocus::Attendees => {
                form.attendees.pop();
            }
            BookingFocus::Description => {
                form.description.pop();
            }
            BookingFocus::Pattern => {
                form.recurrence_pattern.pop();
            }
            BookingFocus::Interval => {
                form.recurrence_interval.pop();
            }
            BookingFocus::EndDate => {
                form.recurrence_end_date.pop();
            }
            BookingFocus::Recurring => {}
        },
        KeyCode::Char(c) => match form.focus {
            BookingFocus::Start => {
                if can_add_text_char(form.start.len(), c) {
                    form.start.push(c);
                }
            }
            BookingFocus::End => {
                if can_add_text_char(form.end.len(), c) {
                    form.end.push(c);
                }
            }
            BookingFocus::Attendees => {
                if c.is_ascii_digit() && form.attendees.len() < 4 {
                    form.attendees.push(c);
                }
            }
            BookingFocus::Description => {
                if can_add_text_char(form.description.len(), c) {
                    form.description.push(c);
                }
            }
            BookingFocus::Recurring => {
                if c == ' ' {
                    form.is_recurring = !form.is_recurring;
                }
            }
            BookingFocus::Pattern => {
                if can_add_text_char(form.recurrence_pattern.len(), c) {
                    form.recurrence_pattern.push(c);
                }
            }
            BookingFocus::Interval => {
                if c.is_ascii_digit() && form.recurrence_interval.len() < 3 {
                    form.recurrence_interval.push(c);
                }
            }
            BookingFocus::EndDate => {
                if can_add_text_char(form.recurrence_end_date.len(), c) {
                    form.recurrence_end_date.push(c);
                }
            }
        },
        _ => {}
    }
}

fn handle_payment_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.payment_form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    if form.submitting {
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.payment_form = None;
            app.state = AppState::Normal;
        }
        KeyCode::Down | KeyCode::Tab => {
            form.focus = match form.focus {
                PaymentFocus::Amount => PaymentFocus::Method,
                PaymentFocus::Method => PaymentFocus::Button,
                PaymentFocus::Button => PaymentFocus::Amount,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            form.focus = match form.focus {
                PaymentFocus::Amount => PaymentFocus::Button,
                PaymentFocus::Method => PaymentFocus::Amount,
                PaymentFocus::Button => PaymentFocus::Method,
            };
        }
        KeyCode::Enter => match form.focus {
            PaymentFocus::Amount => form.focus = PaymentFocus::Method,
            PaymentFocus::Method => form.focus = PaymentFocus::Button,
            PaymentFocus::Button => {
                if form.validate() {
                    app.submit_payment();
                }
            }
        },
        KeyCode::Backspace => match form.focus {
            PaymentFocus::Amount => {
                form.amount.pop();
            }
            PaymentFocus::Method => {
                form.payment_method.pop();
            }
            PaymentFocus::Button => {}
        },
        KeyCode::Char(c) => match form.focus {
            PaymentFocus::Amount => {
                if (c.is_ascii_digit() || c == '.') && form.amount.len() < 10 {
                    form.amount.push(c);
                }
            }
            PaymentFocus::Method => {
                if can_add_text_char(form.payment_method.len(), c) {
                    form.payment_method.push(c);
                }
            }
            PaymentFocus::Button => {}
        },
        _ => {}
    }
}

fn handle_review_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.review_form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    if form.submitting {
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.review_form = None;
            app.state = AppState::Normal;
        }
        KeyCode::Up => {
            form.rating = (form.rating + 1).min(5);
        }
        KeyCode::Down => {
            form.rating = (form.rating - 1).max(1);
        }
        KeyCode::Enter => {
            if form.validate() {
                app.submit_review();
            }
        }
        KeyCode::Delete => {
            if let Some(review_id) = form.editing_review_id {
                let resource_id = form.resource_id;
                app.review_form = None;
                app.state = AppState::Normal;
                app.delete_review(review_id, resource_id);
            }
        }
        KeyCode::Backspace => {
            form.comment.pop();
        }
        KeyCode::Char(c) => {
            if can_add_text_char(form.comment.len(), c) {
                form.comment.push(c);
            }
        }
        _ => {}
    }
}

fn handle_resources_input(app: &mut App, key: KeyEvent) {
    let max_index = app.get_sorted_resources().len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.resource_selection = (app.resource_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.resource_selection = app.resource_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.resource_selection = 0;
        }
        KeyCode::End => {
            app.resource_selection = max_index;
        }
        KeyCode::PageDown => {
            app.resource_selection = (app.resource_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.resource_selection = app.resource_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            // Load reviews and live availability for the selected resource
            if let Some(resource_id) = app.selected_resource().map(|r| r.id) {
                app.fetch_resource_detail(resource_id);
                app.focus = Focus::Detail;
            }
        }
        KeyCode::Char('b') => {
            if let Some(resource) = app.selected_resource() {
                app.booking_form = Some(BookingForm::for_resource(resource));
                app.state = AppState::Booking;
            }
        }
        // Sort keys (only in list focus)
        KeyCode::Char('n') if app.focus == Focus::List => {
            app.toggle_resource_sort(ResourceSortColumn::Name);
        }
        KeyCode::Char('c') if app.focus == Focus::List => {
            app.toggle_resource_sort(ResourceSortColumn::Category);
        }
        KeyCode::Char('r') if app.focus == Focus::List => {
            app.toggle_resource_sort(ResourceSortColumn::Rate);
        }
        KeyCode::Char('g') if app.focus == Focus::List => {
            app.toggle_resource_sort(ResourceSortColumn::Rating);
        }
        _ => {}
    }
}

fn handle_reservations_input(app: &mut App, key: KeyEvent) {
    let max_index = app.get_sorted_reservations().len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.reservation_selection = (app.reservation_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.reservation_selection = app.reservation_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.reservation_selection = 0;
        }
        KeyCode::End => {
            app.reservation_selection = max_index;
        }
        KeyCode::PageDown => {
            app.reservation_selection =
                (app.reservation_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.reservation_selection = app.reservation_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            app.focus = Focus::Detail;
        }
        KeyCode::Char('c') => {
            // Cancel the selected reservation if it still occupies its window
            let target = app
                .selected_reservation()
                .filter(|r| r.status.is_active())
                .map(|r| r.id);
            if let Some(id) = target {
                app.update_reservation_status(id, ReservationStatus::Cancelled);
            }
        }
        KeyCode::Char('p') => {
            let form = app
                .selected_reservation()
                .filter(|r| !r.is_paid && r.status.is_active())
                .map(PaymentForm::for_reservation);
            if let Some(form) = form {
                app.payment_form = Some(form);
                app.state = AppState::Paying;
            }
        }
        KeyCode::Char('v') => {
            // Review a completed reservation; edit the user's existing one if present
            let user_id = app.session.user().map(|u| u.id.clone());
            let form = app
                .selected_reservation()
                .filter(|r| r.status == ReservationStatus::Completed)
                .map(|r| {
                    let own_review = r
                        .reviews
                        .iter()
                        .find(|rv| Some(rv.user_id.as_str()) == user_id.as_deref());
                    match own_review {
                        Some(review) => ReviewForm::for_existing(r.id, r.resource_id, review),
                        None => ReviewForm::for_reservation(r),
                    }
                });
            if let Some(form) = form {
                app.review_form = Some(form);
                app.state = AppState::Reviewing;
            }
        }
        KeyCode::Char('d') => {
            // Refund a completed payment
            let payment_id = app
                .selected_reservation()
                .and_then(|r| r.payment_details.as_ref())
                .filter(|p| p.status == PaymentStatus::Completed)
                .map(|p| p.id);
            if let Some(id) = payment_id {
                app.refund_payment(id);
            }
        }
        // Sort keys (only in list focus)
        KeyCode::Char('s') if app.focus == Focus::List => {
            app.toggle_reservation_sort(ReservationSortColumn::Start);
        }
        KeyCode::Char('r') if app.focus == Focus::List => {
            app.toggle_reservation_sort(ReservationSortColumn::Resource);
        }
        KeyCode::Char('t') if app.focus == Focus::List => {
            app.toggle_reservation_sort(ReservationSortColumn::Status);
        }
        KeyCode::Char('f') => {
            app.cycle_status_filter();
            app.reservation_selection = 0;
        }
        _ => {}
    }
}

fn handle_notifications_input(app: &mut App, key: KeyEvent) {
    let max_index = app.notifications.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.notification_selection = (app.notification_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.notification_selection = app.notification_selection.saturating_sub(1);
        }
        KeyCode::Home => {
            app.notification_selection = 0;
        }
        KeyCode::End => {
            app.notification_selection = max_index;
        }
        KeyCode::PageDown => {
            app.notification_selection =
                (app.notification_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::PageUp => {
            app.notification_selection =
                app.notification_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => {
            app.focus = Focus::Detail;
        }
        KeyCode::Char('r') => {
            let id = app
                .notifications
                .get(app.notification_selection)
                .filter(|n| !n.is_read)
                .map(|n| n.id);
            if let Some(id) = id {
                app.mark_notification_read(id);
            }
        }
        KeyCode::Char('a') => {
            if app.unread_count > 0 {
                app.mark_all_notifications_read();
            }
        }
        _ => {}
    }
}

fn handle_account_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('L') {
        app.logout();
    }
}
