use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::Quote;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_optional_date, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.quotes.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No quotes yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :new <client> | <event> | <YYYY-MM-DD>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Quotes (0)")),
            area,
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(4)])
        .split(columns[1]);

    render_list(f, columns[0], app);
    if let Some(quote) = app.selected_quote() {
        render_summary(f, detail[0], quote, app.is_stale(quote));
        render_items(f, detail[1], quote, app.item_index);
    }
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Date", "Event", "Client", "Status", "Total"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .quotes
        .iter()
        .enumerate()
        .skip(app.quote_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, q)| {
            let style = if i == app.quote_index {
                theme::selected_style()
            } else if q.event_month() == Some(app.current_month) {
                Style::default().fg(theme::HEADER_FG).add_modifier(Modifier::BOLD)
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let marker = if app.is_stale(q) { "!" } else { " " };
            Row::new(vec![
                Cell::from(format!("{marker}{}", format_optional_date(q.event_date))),
                Cell::from(truncate(&q.event_name, 24)),
                Cell::from(truncate(&q.client_name, 18)),
                Cell::from(Span::styled(
                    q.status.as_str(),
                    Style::default().fg(theme::status_color(q.status)),
                )),
                Cell::from(format_currency(q.snapshot.total_sales)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(12),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(15),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Quotes ({})", app.quotes.len())));
    f.render_widget(table, area);
}

fn summary_row(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<18}"), theme::dim_style()),
        Span::styled(value, style),
    ])
}

fn render_summary(f: &mut Frame, area: Rect, quote: &Quote, stale: bool) {
    let snap = &quote.snapshot;
    let bold = Style::default()
        .fg(theme::TEXT)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        summary_row("Pricing", quote.pricing_mode.to_string(), theme::normal_style()),
        summary_row(
            "Fixed cost share",
            format_currency(snap.fixed_cost_share),
            theme::normal_style(),
        ),
        summary_row(
            "Variable cost",
            format_currency(snap.total_variable_cost),
            theme::normal_style(),
        ),
        summary_row("Total cost", format_currency(snap.total_cost()), bold),
        summary_row("Total sales", format_currency(snap.total_sales), bold),
        summary_row(
            "Net profit",
            format_currency(snap.net_profit),
            theme::signed_style(snap.net_profit),
        ),
        summary_row(
            "Margin",
            format_percent(snap.margin_percent),
            theme::signed_style(snap.margin_percent),
        ),
    ];
    if stale {
        lines.push(Line::from(Span::styled(
            " ! Costs changed since this was priced. Press r to reprice",
            Style::default().fg(theme::YELLOW),
        )));
    } else if snap.total_sales == Decimal::ZERO && !quote.items.is_empty() {
        lines.push(Line::from(Span::styled(
            " No sales: items need unit prices",
            Style::default().fg(theme::YELLOW),
        )));
    }

    let title = format!("{} #{}", quote.label(), quote.id.unwrap_or(0));
    f.render_widget(Paragraph::new(lines).block(theme::panel(title)), area);
}

fn render_items(f: &mut Frame, area: Rect, quote: &Quote, item_index: usize) {
    if quote.items.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No items. Add with :item or :use",
            theme::dim_style(),
        )))
        .centered()
        .block(theme::panel("Items (0)"));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Item", "Qty", "Unit cost", "Unit price", "Total"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = quote
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == item_index {
                Style::default().fg(theme::HEADER_BG).bg(theme::YELLOW)
            } else {
                theme::normal_style()
            };
            let price = item
                .unit_price
                .map(format_currency)
                .unwrap_or_else(|| "—".into());
            let total = item
                .total_price()
                .map(format_currency)
                .unwrap_or_else(|| format_currency(item.total_cost()));
            Row::new(vec![
                Cell::from(truncate(&item.name, 20)),
                Cell::from(item.quantity.to_string()),
                Cell::from(format_currency(item.unit_cost)),
                Cell::from(price),
                Cell::from(total),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(10),
        Constraint::Length(5),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Items ({})", quote.items.len())));
    f.render_widget(table, area);
}
