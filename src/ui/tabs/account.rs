use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_profile(frame, app, chunks[0]);
    render_payments(frame, app, chunks[1]);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    match app.session.user() {
        Some(user) => {
            lines.push(Line::from(Span::styled(
                user.full_name(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("Email: ", styles::muted_style()),
                Span::raw(user.email.clone()),
            ]));

            if let Some(ref phone) = user.phone_number {
                if !phone.is_empty() {
                    lines.push(Line::from(vec![
                        Span::styled("Phone: ", styles::muted_style()),
                        Span::raw(phone.clone()),
                    ]));
                }
            }

            if !user.role.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Role:  ", styles::muted_style()),
                    Span::raw(user.role.clone()),
                ]));
            }

            if let Some(ref data) = app.session.data {
                lines.push(Line::from(""));
                let hours = data.hours_until_expiry();
                let expiry_style = if hours <= 1 {
                    styles::error_style()
                } else {
                    styles::muted_style()
                };
                lines.push(Line::from(vec![
                    Span::styled("Session expires in ", styles::muted_style()),
                    Span::styled(format!("{} h", hours), expiry_style),
                ]));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Not logged in",
                styles::muted_style(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Cache", styles::highlight_style())));
    lines.push(Line::from(vec![
        Span::styled("  Resources:    ", styles::muted_style()),
        Span::raw(app.cache_ages.resources_age()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Reservations: ", styles::muted_style()),
        Span::raw(app.cache_ages.reservations_age()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[L] log out",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Account ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(matches!(app.focus, Focus::List)));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_payments(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let header_cells = [
        Cell::from("Amount"),
        Cell::from("Method"),
        Cell::from("Status"),
        Cell::from("Reservation"),
    ];
    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .payments
        .iter()
        .map(|payment| {
            let status_style = match payment.status {
                crate::models::PaymentStatus::Completed => styles::success_style(),
                crate::models::PaymentStatus::Failed => styles::error_style(),
                crate::models::PaymentStatus::Refunded => styles::muted_style(),
                crate::models::PaymentStatus::Pending => styles::highlight_style(),
            };
            let method = if payment.payment_method.is_empty() {
                "-"
            } else {
                payment.payment_method.as_str()
            };

            Row::new(vec![
                Cell::from(payment.amount_label()),
                Cell::from(method),
                Cell::from(Span::styled(payment.status.to_string(), status_style)),
                Cell::from(format!("#{}", payment.reservation_id)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let title = format!(" Payments ({}) ", app.payments.len());

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    frame.render_stateful_widget(table, area, &mut state);
}
