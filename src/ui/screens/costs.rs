use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::{CostScope, FixedCost};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_costs(f, chunks[0], app);
    render_parameters(f, chunks[1], app);
}

fn render_costs(f: &mut Frame, area: Rect, app: &App) {
    if app.fixed_costs.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No fixed costs", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :cost <name> <amount> [YYYY-MM]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Fixed Costs (0)"));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Cost", "Applies to", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    // Group rows interleave with cost rows, so the flat index is tracked separately
    let mut rows: Vec<Row> = Vec::new();
    let mut flat = 0;
    for (scope, members) in FixedCost::group_by_scope(&app.fixed_costs) {
        let label = match scope {
            CostScope::Recurring => "Recurring (every month)".to_string(),
            CostScope::Period(m) => format!("Only {m}"),
        };
        rows.push(
            Row::new(vec![
                Cell::from(label),
                Cell::from(""),
                Cell::from(format_currency(FixedCost::total(&members))),
            ])
            .style(
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            ),
        );
        for cost in members {
            let style = if flat == app.cost_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            rows.push(
                Row::new(vec![
                    Cell::from(format!("  {}", truncate(&cost.name, 30))),
                    Cell::from(cost.scope.to_string()),
                    Cell::from(format_currency(cost.amount)),
                ])
                .style(style),
            );
            flat += 1;
        }
    }

    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Fixed Costs ({})", app.fixed_costs.len())));
    f.render_widget(table, area);
}

fn render_parameters(f: &mut Frame, area: Rect, app: &App) {
    let params = &app.params;
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Occupancy rate     ", theme::dim_style()),
            Span::styled(format_percent(params.occupancy_rate), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Working days       ", theme::dim_style()),
            Span::styled(
                params.working_days_per_month.to_string(),
                theme::normal_style(),
            ),
        ]),
        Line::from(""),
    ];

    match &app.overhead {
        Some(b) if b.is_degenerate() => {
            lines.push(Line::from(Span::styled(
                " No expected events this month.",
                Style::default().fg(theme::RED),
            )));
            lines.push(Line::from(Span::styled(
                " Fixed costs are not allocated to quotes.",
                Style::default().fg(theme::RED),
            )));
        }
        Some(b) => {
            lines.push(Line::from(Span::styled(
                format!(
                    " {} days x {} = {} events",
                    params.working_days_per_month,
                    format_percent(params.occupancy_rate),
                    b.expected_events.normalize()
                ),
                theme::normal_style(),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    " {} / {} = {}",
                    format_currency(b.total_fixed),
                    b.expected_events.normalize(),
                    format_currency(b.share)
                ),
                theme::normal_style(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(" Share per event    ", theme::dim_style()),
                Span::styled(
                    format_currency(b.share),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        None => {}
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " :params <occupancy%> <days> to change",
        theme::dim_style(),
    )));

    let title = format!("Allocation {}", app.current_month);
    f.render_widget(Paragraph::new(lines).block(theme::panel(title)), area);
}
