use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::ui::tabs::resources::wrap_text;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_reservation_list(frame, app, chunks[0]);
    render_reservation_detail(frame, app, chunks[1]);
}

fn render_reservation_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header_cells = [
        Cell::from("Resource"),
        Cell::from("Start"),
        Cell::from("Status"),
        Cell::from("Paid"),
    ];
    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let sorted_reservations = app.get_sorted_reservations();

    let rows: Vec<Row> = sorted_reservations
        .iter()
        .enumerate()
        .map(|(i, reservation)| {
            let row_style = if i == app.reservation_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let paid = if reservation.is_paid { "yes" } else { "no" };

            Row::new(vec![
                Cell::from(reservation.resource_label()),
                Cell::from(reservation.formatted_start_short()),
                Cell::from(Span::styled(
                    reservation.status.to_string(),
                    styles::status_style(reservation.status),
                )),
                Cell::from(paid),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),    // Resource
        Constraint::Length(14), // Start: "Mar 04 2:30p"
        Constraint::Length(10), // Status
        Constraint::Length(5),  // Paid
    ];

    let filter = match app.status_filter {
        Some(status) => status.to_string(),
        None => "all".to_string(),
    };
    let title = format!(
        " Reservations ({}, {}) - [s]tart [r]esource s[t]atus [f]ilter ",
        sorted_reservations.len(),
        filter
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.reservation_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_reservation_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app.selected_reservation();

    let content = match selected {
        Some(reservation) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                reservation.resource_label(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("When:      ", styles::muted_style()),
                Span::raw(reservation.formatted_window()),
            ]));

            if let Some(hours) = reservation.duration_hours() {
                lines.push(Line::from(vec![
                    Span::styled("Duration:  ", styles::muted_style()),
                    Span::raw(format!("{} h", hours)),
                ]));
            }

            lines.push(Line::from(vec![
                Span::styled("Status:    ", styles::muted_style()),
                Span::styled(
                    reservation.status.to_string(),
                    styles::status_style(reservation.status),
                ),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Attendees: ", styles::muted_style()),
                Span::raw(format!("{}", reservation.attendees)),
            ]));

            if let Some(ref location) = reservation.resource_location {
                if !location.is_empty() {
                    lines.push(Line::from(vec![
                        Span::styled("Location:  ", styles::muted_style()),
                        Span::raw(location.clone()),
                    ]));
                }
            }

            if let Some(label) = reservation.recurrence_label() {
                lines.push(Line::from(vec![
                    Span::styled("Repeats:   ", styles::muted_style()),
                    Span::raw(label),
                ]));
            }

            if let Some(price) = reservation.price {
                let paid = if reservation.is_paid {
                    Span::styled("  paid", styles::success_style())
                } else {
                    Span::styled("  unpaid", styles::error_style())
                };
                lines.push(Line::from(vec![
                    Span::styled("Price:     ", styles::muted_style()),
                    Span::raw(format!("{:.2}", price)),
                    paid,
                ]));
            }

            lines.push(Line::from(""));

            if let Some(ref description) = reservation.description {
                if !description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "Description",
                        styles::highlight_style(),
                    )));
                    for line in wrap_text(
                        description.trim(),
                        (area.width as usize).saturating_sub(4),
                    ) {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::from(""));
                }
            }

            if let Some(ref notes) = reservation.notes {
                if !notes.is_empty() {
                    lines.push(Line::from(Span::styled("Notes", styles::highlight_style())));
                    for line in wrap_text(notes.trim(), (area.width as usize).saturating_sub(4)) {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::from(""));
                }
            }

            if let Some(ref payment) = reservation.payment_details {
                lines.push(Line::from(Span::styled("Payment", styles::highlight_style())));
                lines.push(Line::from(vec![
                    Span::styled("  Amount:  ", styles::muted_style()),
                    Span::raw(payment.amount_label()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("  Status:  ", styles::muted_style()),
                    Span::raw(payment.status.to_string()),
                ]));
                if !payment.transaction_id.is_empty() {
                    lines.push(Line::from(vec![
                        Span::styled("  Txn:     ", styles::muted_style()),
                        Span::raw(payment.transaction_id.clone()),
                    ]));
                }
                lines.push(Line::from(""));
            }

            if !reservation.reviews.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("Reviews ({})", reservation.reviews.len()),
                    styles::highlight_style(),
                )));
                for review in &reservation.reviews {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {} ", review.stars()), styles::highlight_style()),
                        Span::styled(review.author_label(), styles::muted_style()),
                    ]));
                }
                lines.push(Line::from(""));
            }

            // Action hints depend on the lifecycle state
            let mut hints: Vec<&str> = Vec::new();
            if reservation.status.is_active() {
                hints.push("[c] cancel");
            }
            if !reservation.is_paid && reservation.status.is_active() {
                hints.push("[p] pay");
            }
            if reservation.status == crate::models::ReservationStatus::Completed {
                hints.push("[v] review");
            }
            if reservation
                .payment_details
                .as_ref()
                .is_some_and(|p| p.status == crate::models::PaymentStatus::Completed)
            {
                hints.push("[d] refund");
            }
            if !hints.is_empty() {
                lines.push(Line::from(Span::styled(
                    hints.join("  "),
                    styles::muted_style(),
                )));
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "Select a reservation from the list",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
