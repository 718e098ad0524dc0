use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::ui::tabs::resources::wrap_text;
use crate::utils::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_notification_list(frame, app, chunks[0]);
    render_notification_detail(frame, app, chunks[1]);
}

fn render_notification_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let items: Vec<ListItem> = app
        .notifications
        .iter()
        .map(|notification| {
            let marker_style = if notification.is_read {
                styles::muted_style()
            } else {
                styles::highlight_style()
            };
            let title_style = if notification.is_read {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", notification.read_marker()), marker_style),
                Span::styled(truncate(&notification.title, 44), title_style),
                Span::styled(
                    format!("  {}", notification.created_label()),
                    styles::muted_style(),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " Notifications ({} unread) - [r]ead [a]ll read ",
        app.unread_count
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.notifications.is_empty() {
        state.select(Some(app.notification_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_notification_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app.notifications.get(app.notification_selection);

    let content = match selected {
        Some(notification) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                notification.title.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("When: ", styles::muted_style()),
                Span::raw(notification.created_label()),
            ]));

            if !notification.kind.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Type: ", styles::muted_style()),
                    Span::raw(notification.kind.clone()),
                ]));
            }

            if let Some(reservation_id) = notification.reservation_id {
                lines.push(Line::from(vec![
                    Span::styled("Reservation: ", styles::muted_style()),
                    Span::raw(format!("#{}", reservation_id)),
                ]));
            }

            lines.push(Line::from(""));

            for line in wrap_text(
                notification.message.trim(),
                (area.width as usize).saturating_sub(4),
            ) {
                lines.push(Line::from(line));
            }

            if !notification.is_read {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Press 'r' to mark as read",
                    styles::muted_style(),
                )));
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "No notifications",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
