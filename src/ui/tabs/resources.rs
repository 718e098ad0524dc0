use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::format_date;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_resource_list(frame, app, chunks[0]);
    render_resource_detail(frame, app, chunks[1]);
}

fn render_resource_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    // Header row
    let header_cells = [
        Cell::from("Name"),
        Cell::from("Category"),
        Cell::from("Rate"),
        Cell::from("Avail"),
        Cell::from("Rating"),
    ];
    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let sorted_resources = app.get_sorted_resources();

    // Data rows
    let rows: Vec<Row> = sorted_resources
        .iter()
        .enumerate()
        .map(|(i, resource)| {
            let style = if i == app.resource_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let category = if resource.category.is_empty() {
                "-"
            } else {
                resource.category.as_str()
            };

            Row::new(vec![
                Cell::from(resource.name.as_str()),
                Cell::from(category),
                Cell::from(resource.rate_label()),
                Cell::from(resource.availability_label()),
                Cell::from(resource.rating_label()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(36), // Name
        Constraint::Fill(1),        // Category
        Constraint::Length(11),     // Rate: "150.00/day"
        Constraint::Length(6),      // Avail
        Constraint::Length(6),      // Rating
    ];

    let sort_help = "[n]ame [c]ategory [r]ate [g] rating";
    let title = format!(" Resources ({}) - {} ", sorted_resources.len(), sort_help);

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
    state.select(Some(app.resource_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_resource_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app.selected_resource();

    let content = match selected {
        Some(resource) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                resource.name.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            if !resource.location.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Location:  ", styles::muted_style()),
                    Span::raw(resource.location.clone()),
                ]));
            }

            if !resource.category.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Category:  ", styles::muted_style()),
                    Span::raw(resource.category.clone()),
                ]));
            }

            lines.push(Line::from(vec![
                Span::styled("Capacity:  ", styles::muted_style()),
                Span::raw(format!("{}", resource.capacity)),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Rate:      ", styles::muted_style()),
                Span::raw(resource.rate_label()),
            ]));

            if let Some(max_hours) = resource.max_reservation_hours {
                lines.push(Line::from(vec![
                    Span::styled("Max hours: ", styles::muted_style()),
                    Span::raw(format!("{}", max_hours)),
                ]));
            }

            let availability = match resource.availability_label() {
                "now" => Span::styled("available now", styles::success_style()),
                "busy" => Span::styled("in use", styles::error_style()),
                "yes" => Span::styled("available", styles::success_style()),
                _ => Span::styled("unavailable", styles::muted_style()),
            };
            lines.push(Line::from(vec![
                Span::styled("Status:    ", styles::muted_style()),
                availability,
            ]));

            if let Some(next) = resource.next_available_label() {
                lines.push(Line::from(vec![
                    Span::styled("Free at:   ", styles::muted_style()),
                    Span::raw(next),
                ]));
            }

            lines.push(Line::from(""));

            if !resource.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Description",
                    styles::highlight_style(),
                )));
                for line in wrap_text(
                    resource.description.trim(),
                    (area.width as usize).saturating_sub(4),
                ) {
                    lines.push(Line::from(line));
                }
                lines.push(Line::from(""));
            }

            if let Some(ref rules) = resource.rules {
                if !rules.is_empty() {
                    lines.push(Line::from(Span::styled("Rules", styles::highlight_style())));
                    for line in wrap_text(rules.trim(), (area.width as usize).saturating_sub(4)) {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::from(""));
                }
            }

            // Upcoming reservations, fetched on Enter
            if let Some(upcoming) = app.resource_upcoming.get(&resource.id) {
                lines.push(Line::from(Span::styled(
                    format!("Upcoming ({})", upcoming.len()),
                    styles::highlight_style(),
                )));
                if upcoming.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "  No upcoming reservations",
                        styles::muted_style(),
                    )));
                } else {
                    for reservation in upcoming.iter().take(5) {
                        lines.push(Line::from(vec![
                            Span::raw("  "),
                            Span::raw(reservation.formatted_window()),
                        ]));
                    }
                }
                lines.push(Line::from(""));
            }

            // Reviews, cached per resource
            match app.resource_reviews.get(&resource.id) {
                Some(reviews) => {
                    lines.push(Line::from(Span::styled(
                        format!("Reviews ({})", reviews.len()),
                        styles::highlight_style(),
                    )));
                    if reviews.is_empty() {
                        lines.push(Line::from(Span::styled(
                            "  No reviews yet",
                            styles::muted_style(),
                        )));
                    }
                    for review in reviews {
                        let mut header = vec![
                            Span::styled(format!("  {} ", review.stars()), styles::highlight_style()),
                            Span::styled(review.author_label().to_string(), styles::muted_style()),
                        ];
                        if !review.created_at.is_empty() {
                            header.push(Span::styled(
                                format!("  {}", format_date(&review.created_at)),
                                styles::muted_style(),
                            ));
                        }
                        lines.push(Line::from(header));
                        if !review.comment.is_empty() {
                            for line in wrap_text(
                                review.comment.trim(),
                                (area.width as usize).saturating_sub(6),
                            ) {
                                lines.push(Line::from(format!("    {}", line)));
                            }
                        }
                    }
                }
                None => {
                    lines.push(Line::from(Span::styled(
                        "Press Enter to load reviews and availability",
                        styles::muted_style(),
                    )));
                }
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "Select a resource from the list",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Detail - [b]ook ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

pub(crate) fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
