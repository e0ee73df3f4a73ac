use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::pricing::margin_percent;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.catalog.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Catalog is empty", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add a template with :add-catalog <name> <unit cost> <unit price>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Catalog (0)"));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["#", "Name", "Unit cost", "Unit price", "Margin"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .catalog
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.catalog_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let margin = margin_percent(
                item.default_unit_price - item.default_unit_cost,
                item.default_unit_price,
            );
            let margin_cell = if item.default_unit_price == Decimal::ZERO {
                Cell::from("—")
            } else {
                Cell::from(Span::styled(format_percent(margin), theme::signed_style(margin)))
            };
            Row::new(vec![
                Cell::from(item.id.map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(truncate(&item.name, 36)),
                Cell::from(format_currency(item.default_unit_cost)),
                Cell::from(format_currency(item.default_unit_price)),
                margin_cell,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(15),
        Constraint::Length(15),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Catalog ({})", app.catalog.len())));
    f.render_widget(table, area);
}
