use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{
    App, AppState, BookingFocus, BookingStep, LoginFocus, PaymentFocus, RegisterFocus, Tab,
};
use crate::forms::FieldError;

use super::styles;
use super::tabs::{account, notifications, reservations, resources};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::Registering => render_register_overlay(frame, app),
        AppState::Booking => render_booking_overlay(frame, app),
        AppState::Paying => render_payment_overlay(frame, app),
        AppState::Reviewing => render_review_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

// ASCII art logo, shared by the dialog overlays
const LOGO: [&str; 3] = [
    "   ╔╗ ╔═╗╔═╗╦╔═╔╦╗╔═╗╔═╗╦╔═",
    "   ╠╩╗║ ║║ ║╠╩╗ ║║║╣ ╚═╗╠╩╗",
    "   ╚═╝╚═╝╚═╝╩ ╩═╩╝╚═╝╚═╝╩ ╩",
];

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  Bookdesk";
    let help_hint = "[?] Help";
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let notifications_label = if app.unread_count > 0 {
        format!("[3] Notifications ({})", app.unread_count)
    } else {
        "[3] Notifications".to_string()
    };

    let tabs = vec![
        ("[1] Resources".to_string(), app.current_tab == Tab::Resources),
        (
            "[2] Reservations".to_string(),
            app.current_tab == Tab::Reservations,
        ),
        (notifications_label, app.current_tab == Tab::Notifications),
        ("[4] Account".to_string(), app.current_tab == Tab::Account),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if selected {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Resources => resources::render(frame, app, area),
        Tab::Reservations => reservations::render(frame, app, area),
        Tab::Notifications => notifications::render(frame, app, area),
        Tab::Account => account::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[u]pdate | [/] search | [q]uit";

    let left_text = if matches!(app.state, AppState::Searching) {
        format!(" Search: {}▌ ", app.search_query)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if !app.search_query.is_empty() {
        format!(" Filter: {} (Esc clears) ", app.search_query)
    } else {
        format!(" Updated {} ", app.cache_ages.last_updated())
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let left_style = if matches!(app.state, AppState::Searching) {
        styles::search_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect_fixed(54, 28, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.push(Line::from(Span::styled(
        format!("          version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    for (key, desc) in [
        ("  1-4       ", "Switch tabs"),
        ("  ←/→       ", "Prev/next tab"),
        ("  Tab       ", "Switch focus (list ↔ detail)"),
        ("  ↑/↓       ", "Navigate list"),
        ("  Enter     ", "Load details (reviews, availability)"),
        ("  Esc       ", "Go back"),
    ] {
        help_text.push(Line::from(vec![
            Span::styled(key, styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Actions", styles::highlight_style())));
    for (key, desc) in [
        ("  /         ", "Search"),
        ("  u         ", "Refresh from server"),
        ("  b         ", "Book the selected resource"),
        ("  c         ", "Cancel the selected reservation"),
        ("  p         ", "Pay for the selected reservation"),
        ("  v         ", "Review a completed reservation"),
        ("  r / a     ", "Mark notification / all read"),
        ("  q         ", "Quit"),
    ] {
        help_text.push(Line::from(vec![
            Span::styled(key, styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Sorting", styles::highlight_style())));
    help_text.push(Line::from(vec![
        Span::styled("  n/c/r/g   ", styles::help_key_style()),
        Span::styled("Resources: name/category/rate/rating", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  s/r/t/f   ", styles::help_key_style()),
        Span::styled("Reservations: start/resource/status/filter", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

/// A bracketed input field with a block cursor when focused
fn field_line<'a>(label: &'a str, value: String, focused: bool, width: usize) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let shown: String = value.chars().rev().take(width).collect::<Vec<_>>().into_iter().rev().collect();
    let display = format!("{:<width$}", shown, width = width);
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn error_lines(errors: &[FieldError]) -> Vec<Line<'static>> {
    errors
        .iter()
        .map(|e| {
            Line::from(Span::styled(
                format!("  {}: {}", e.field, e.message),
                styles::error_style(),
            ))
        })
        .collect()
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(50, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));

    lines.push(field_line(
        "Email:    ",
        app.login_email.clone(),
        app.login_focus == LoginFocus::Email,
        24,
    ));

    let masked = "*".repeat(app.login_password.chars().count().min(24));
    lines.push(field_line(
        "Password: ",
        masked,
        app.login_focus == LoginFocus::Password,
        24,
    ));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Ctrl+R to create an account",
        styles::muted_style(),
    )));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_register_overlay(frame: &mut Frame, app: &App) {
    let form = &app.register_form;
    let height = 18 + form.errors.len().min(4) as u16;
    let area = centered_rect_fixed(54, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(Span::styled(
        "          Create an account",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    lines.push(field_line(
        "First name: ",
        form.first_name.clone(),
        app.register_focus == RegisterFocus::FirstName,
        24,
    ));
    lines.push(field_line(
        "Last name:  ",
        form.last_name.clone(),
        app.register_focus == RegisterFocus::LastName,
        24,
    ));
    lines.push(field_line(
        "Email:      ",
        form.email.clone(),
        app.register_focus == RegisterFocus::Email,
        24,
    ));
    lines.push(field_line(
        "Password:   ",
        "*".repeat(form.password.chars().count().min(24)),
        app.register_focus == RegisterFocus::Password,
        24,
    ));
    lines.push(field_line(
        "Confirm:    ",
        "*".repeat(form.confirm_password.chars().count().min(24)),
        app.register_focus == RegisterFocus::ConfirmPassword,
        24,
    ));
    lines.push(field_line(
        "Phone:      ",
        form.phone_number.clone(),
        app.register_focus == RegisterFocus::Phone,
        24,
    ));

    let terms_focused = app.register_focus == RegisterFocus::Terms;
    let terms_style = if terms_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let terms_mark = if form.terms_accepted { "x" } else { " " };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("[{}]", terms_mark), terms_style),
        Span::styled(" I accept the terms of service", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.register_focus == RegisterFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if button_focused {
        " ▶ Register ◀ "
    } else {
        "   Register   "
    };
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.extend(error_lines(&form.errors));

    lines.push(Line::from(Span::styled(
        "  Esc to go back to login",
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_booking_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.booking_form.as_ref() else {
        return;
    };

    let area = centered_rect_fixed(58, 20, frame.area());
    frame.render_widget(Clear, area);

    let step_number = match form.step {
        BookingStep::Times => 1,
        BookingStep::Details => 2,
        BookingStep::Confirm => 3,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  Book: {}", form.resource_name),
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("  Step {}/3", step_number),
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    match form.step {
        BookingStep::Times => {
            lines.push(Line::from(Span::styled(
                "  Times are YYYY-MM-DD HH:MM (24h)",
                styles::muted_style(),
            )));
            lines.push(Line::from(""));
            lines.push(field_line(
                "Start: ",
                form.start.clone(),
                form.focus == BookingFocus::Start,
                20,
            ));
            lines.push(field_line(
                "End:   ",
                form.end.clone(),
                form.focus == BookingFocus::End,
                20,
            ));
            if let Some(max_hours) = form.max_hours {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("  Maximum booking length: {} h", max_hours),
                    styles::muted_style(),
                )));
            }
        }
        BookingStep::Details => {
            lines.push(field_line(
                "Attendees:   ",
                form.attendees.clone(),
                form.focus == BookingFocus::Attendees,
                6,
            ));
            lines.push(Line::from(Span::styled(
                format!("  Capacity: {}", form.capacity),
                styles::muted_style(),
            )));
            lines.push(field_line(
                "Description: ",
                form.description.clone(),
                form.focus == BookingFocus::Description,
                28,
            ));

            let recurring_focused = form.focus == BookingFocus::Recurring;
            let recurring_style = if recurring_focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let mark = if form.is_recurring { "x" } else { " " };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("[{}]", mark), recurring_style),
                Span::styled(" Repeats (Space toggles)", styles::muted_style()),
            ]));

            if form.is_recurring {
                lines.push(field_line(
                    "Pattern:     ",
                    form.recurrence_pattern.clone(),
                    form.focus == BookingFocus::Pattern,
                    10,
                ));
                lines.push(Line::from(Span::styled(
                    "  daily, weekly or monthly",
                    styles::muted_style(),
                )));
                lines.push(field_line(
                    "Every:       ",
                    form.recurrence_interval.clone(),
                    form.focus == BookingFocus::Interval,
                    4,
                ));
                lines.push(field_line(
                    "Until:       ",
                    form.recurrence_end_date.clone(),
                    form.focus == BookingFocus::EndDate,
                    12,
                ));
            }
        }
        BookingStep::Confirm => {
            lines.push(Line::from(vec![
                Span::styled("  When:      ", styles::muted_style()),
                Span::raw(format!("{} - {}", form.start, form.end)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Attendees: ", styles::muted_style()),
                Span::raw(form.attendees.clone()),
            ]));
            if form.is_recurring {
                lines.push(Line::from(vec![
                    Span::styled("  Repeats:   ", styles::muted_style()),
                    Span::raw(format!(
                        "{} x{} until {}",
                        form.recurrence_pattern, form.recurrence_interval, form.recurrence_end_date
                    )),
                ]));
            }
            if let Some(cost) = form.estimated_cost() {
                lines.push(Line::from(vec![
                    Span::styled("  Estimated: ", styles::muted_style()),
                    Span::styled(format!("{:.2}", cost), styles::highlight_style()),
                ]));
            }
            lines.push(Line::from(""));
            if form.submitting {
                lines.push(Line::from(Span::styled(
                    "  Submitting...",
                    styles::highlight_style(),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("  Press ", styles::muted_style()),
                    Span::styled("Enter", styles::help_key_style()),
                    Span::styled(" to confirm the booking", styles::muted_style()),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    lines.extend(error_lines(&form.errors));
    lines.push(Line::from(Span::styled(
        "  Enter next step, Esc back",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" New reservation ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_payment_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.payment_form.as_ref() else {
        return;
    };

    let height = 13 + form.errors.len().min(3) as u16;
    let area = centered_rect_fixed(48, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  Pay reservation #{}", form.reservation_id),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    lines.push(field_line(
        "Amount: ",
        form.amount.clone(),
        form.focus == PaymentFocus::Amount,
        12,
    ));
    lines.push(field_line(
        "Method: ",
        form.payment_method.clone(),
        form.focus == PaymentFocus::Method,
        12,
    ));
    lines.push(Line::from(Span::styled(
        "  credit or paypal",
        styles::muted_style(),
    )));

    lines.push(Line::from(""));
    let button_focused = form.focus == PaymentFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if form.submitting {
        " Paying... "
    } else if button_focused {
        " ▶ Pay ◀ "
    } else {
        "   Pay   "
    };
    lines.push(Line::from(vec![
        Span::raw("          ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.extend(error_lines(&form.errors));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc to cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_review_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.review_form.as_ref() else {
        return;
    };

    let height = 13 + form.errors.len().min(3) as u16;
    let area = centered_rect_fixed(54, height, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.editing_review_id.is_some() {
        "  Edit your review"
    } else {
        "  Review this reservation"
    };

    let stars: String = (1..=5)
        .map(|i| if i <= form.rating { '★' } else { '☆' })
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(title, styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Rating:  ", styles::muted_style()),
            Span::styled(stars, styles::highlight_style()),
            Span::styled("  (↑/↓ to change)", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Comment:", styles::muted_style())),
    ];

    // Multi-line comment box, wrapped to the dialog width
    let comment_width = (area.width as usize).saturating_sub(6);
    let wrapped = super::tabs::resources::wrap_text(&form.comment, comment_width);
    if wrapped.is_empty() {
        lines.push(Line::from(Span::styled("  ▌", styles::selected_style())));
    } else {
        let last = wrapped.len() - 1;
        for (i, line) in wrapped.into_iter().enumerate() {
            if i == last {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", line)),
                    Span::styled("▌", styles::selected_style()),
                ]));
            } else {
                lines.push(Line::from(format!("  {}", line)));
            }
        }
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "  Submitting...",
            styles::highlight_style(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" to submit, ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]));
    }

    if form.editing_review_id.is_some() {
        lines.push(Line::from(Span::styled(
            "  Del removes this review",
            styles::muted_style(),
        )));
    }

    lines.extend(error_lines(&form.errors));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Are you sure you want to quit?",
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" to quit, ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
