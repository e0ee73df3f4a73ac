use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_optional_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(6),    // Upcoming events
            Constraint::Length(3), // Overhead for the month
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_upcoming(f, chunks[1], app);
    render_overhead(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &app.stats;
    render_card(
        f,
        cards[0],
        &format!("Revenue {}", app.current_month),
        format_currency(stats.revenue),
        theme::GREEN,
        "completed events",
    );
    render_card(
        f,
        cards[1],
        "Scheduled",
        stats.scheduled.to_string(),
        theme::ACCENT,
        "booked events",
    );
    render_card(
        f,
        cards[2],
        "Completed",
        stats.completed.to_string(),
        theme::GREEN,
        "all time",
    );
    render_card(
        f,
        cards[3],
        "Pending",
        stats.pending.to_string(),
        theme::YELLOW,
        "draft quotes",
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: &str) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.to_string(), theme::dim_style())),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

fn render_upcoming(f: &mut Frame, area: Rect, app: &App) {
    if app.upcoming.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No upcoming scheduled events", theme::dim_style())),
            Line::from(Span::styled(
                "Create a quote with :new and book it with :status scheduled",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Upcoming Events"));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Date", "Event", "Client", "Guests", "Total"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .upcoming
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format_optional_date(q.event_date)),
                Cell::from(truncate(&q.event_name, 30)),
                Cell::from(truncate(&q.client_name, 24)),
                Cell::from(q.guest_count.to_string()),
                Cell::from(format_currency(q.snapshot.total_sales)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(24),
        Constraint::Length(7),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Upcoming Events ({})", app.upcoming.len())));
    f.render_widget(table, area);
}

fn render_overhead(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.overhead {
        Some(b) if b.is_degenerate() => Line::from(Span::styled(
            " No expected events: check :params, fixed costs are not being allocated",
            Style::default().fg(theme::RED),
        )),
        Some(b) => Line::from(vec![
            Span::styled(" Fixed costs ", theme::dim_style()),
            Span::styled(format_currency(b.total_fixed), theme::normal_style()),
            Span::styled(" / ", theme::dim_style()),
            Span::styled(
                format!("{} events", b.expected_events.normalize()),
                theme::normal_style(),
            ),
            Span::styled(" = ", theme::dim_style()),
            Span::styled(
                format!("{} per event", format_currency(b.share)),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(""),
    };

    let title = format!("Overhead {}", app.current_month);
    f.render_widget(Paragraph::new(line).block(theme::panel(title)), area);
}
