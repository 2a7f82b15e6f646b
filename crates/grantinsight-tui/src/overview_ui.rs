// Overview module: hero, metrics, opportunities, timeline and quick actions
use crate::ui::{to_color, tone_color};
use crate::App;
use grantinsight_core::dashboard::{MetricCard, TimelineEvent, QUICK_ACTIONS};
use grantinsight_core::theme::Tone;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_overview(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Hero
            Constraint::Length(6), // Metric cards
            Constraint::Min(8),    // Opportunities + side column
        ])
        .split(area);

    render_hero(frame, app, rows[0]);
    render_metrics(frame, app, rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(rows[2]);

    // Same search box and status tabs as "Activas": the filter is shared
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Length(3), // Status tabs
            Constraint::Min(5),    // Cards
        ])
        .split(columns[0]);

    crate::opportunities_ui::render_search_input(frame, app, left[0]);
    crate::opportunities_ui::render_status_tabs(frame, app, left[1]);
    crate::opportunities_ui::render_opportunity_list(frame, app, left[2]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(QUICK_ACTIONS.len() as u16 + 2)])
        .split(columns[1]);

    render_timeline(frame, app, side[0]);
    render_quick_actions(frame, app, side[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let primary = tone_color(app, Tone::Primary);
    let active = app
        .metrics
        .first()
        .map(|metric| metric.value.to_string())
        .unwrap_or_else(|| app.engine.repository().len().to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "GrantInsight Dashboard",
                Style::default()
                    .fg(to_color(app.theme.colors.title))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                format!("● {} oportunidades activas", active),
                Style::default().fg(tone_color(app, Tone::Secondary)),
            ),
        ]),
        Line::from(Span::styled(
            "Inteligencia artificial para la gestión de oportunidades de financiación",
            Style::default().fg(to_color(app.theme.colors.subtitle)),
        )),
        Line::from(vec![
            Span::styled(
                " [e] Exportar Reporte ",
                Style::default()
                    .fg(to_color(app.theme.colors.background))
                    .bg(primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                app.export_path.display().to_string(),
                Style::default().fg(tone_color(app, Tone::Muted)),
            ),
        ]),
    ];

    let hero = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(to_color(app.theme.colors.border_focused))),
    );
    frame.render_widget(hero, area);
}

fn render_metrics(frame: &mut Frame, app: &App, area: Rect) {
    if app.metrics.is_empty() {
        return;
    }

    let share = 100 / app.metrics.len() as u16;
    let constraints: Vec<Constraint> = app
        .metrics
        .iter()
        .map(|_| Constraint::Percentage(share))
        .collect();

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, cell) in app.metrics.iter().zip(cells.iter()) {
        render_metric_card(frame, app, metric, *cell);
    }
}

fn render_metric_card(frame: &mut Frame, app: &App, metric: &MetricCard, area: Rect) {
    let trend_color = tone_color(app, metric.trend.tone());

    let mut change = Vec::new();
    if let Some(arrow) = metric.trend.arrow() {
        change.push(Span::styled(format!("{} ", arrow), Style::default().fg(trend_color)));
    }
    change.push(Span::styled(metric.formatted_change(), Style::default().fg(trend_color)));
    change.push(Span::styled(
        format!(" {}", metric.change_label),
        Style::default().fg(tone_color(app, Tone::Muted)),
    ));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", metric.kind.icon()),
                Style::default().fg(tone_color(app, Tone::Primary)),
            ),
            Span::styled(metric.title.clone(), Style::default().fg(to_color(app.theme.colors.subtitle))),
        ]),
        Line::from(Span::styled(
            metric.value.to_string(),
            Style::default()
                .fg(to_color(app.theme.colors.title))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(change),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(to_color(app.theme.colors.border))),
    );
    frame.render_widget(card, area);
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for event in &app.timeline {
        lines.extend(timeline_lines(app, event));
    }

    let timeline = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Timeline de Oportunidades ")
                .border_style(Style::default().fg(to_color(app.theme.colors.border))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(timeline, area);
}

fn timeline_lines<'a>(app: &App, event: &'a TimelineEvent) -> Vec<Line<'a>> {
    let muted = tone_color(app, Tone::Muted);
    vec![
        Line::from(vec![
            Span::styled(
                format!("● {} ", event.kind.label()),
                Style::default().fg(tone_color(app, event.kind.tone())),
            ),
            Span::styled(event.date_label(), Style::default().fg(muted)),
        ]),
        Line::from(Span::styled(
            event.title.as_str(),
            Style::default()
                .fg(to_color(app.theme.colors.foreground))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(event.organization.as_str(), Style::default().fg(muted)),
            Span::raw(" · "),
            Span::styled(event.amount.as_str(), Style::default().fg(tone_color(app, Tone::Secondary))),
            Span::raw(" · "),
            Span::styled(event.region.as_str(), Style::default().fg(muted)),
            Span::raw(" · "),
            Span::styled(
                format!("confianza {}", event.confidence.label()),
                Style::default().fg(tone_color(app, event.confidence.tone())),
            ),
        ]),
        Line::from(""),
    ]
}

fn render_quick_actions(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = QUICK_ACTIONS
        .iter()
        .map(|action| {
            Line::from(Span::styled(
                format!(" › {}", action),
                Style::default().fg(to_color(app.theme.colors.foreground)),
            ))
        })
        .collect();

    let actions = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Acciones Rápidas ")
            .border_style(Style::default().fg(to_color(app.theme.colors.border))),
    );
    frame.render_widget(actions, area);
}

#[cfg(test)]
mod tests {
    use crate::ui::test_support::{app, draw};
    use crate::{handle_key, InputMode};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use grantinsight_core::dashboard::DashboardModule;
    use grantinsight_core::{Status, StatusFilter};

    fn press(app: &mut crate::App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_overview_sections_render() {
        let mut app = app();
        app.enter_dashboard();
        let screen = draw(&mut app, 200, 60);
        assert!(screen.contains("GrantInsight Dashboard"));
        assert!(screen.contains("127 oportunidades activas"));
        assert!(screen.contains("Oportunidades Activas"));
        assert!(screen.contains("+12%"));
        assert!(screen.contains("Timeline de Oportunidades"));
        assert!(screen.contains("Apertura"));
        assert!(screen.contains("Acciones Rápidas"));
        assert!(screen.contains("Nueva Búsqueda IA"));
    }

    #[test]
    fn test_overview_list_follows_filters() {
        let mut app = app();
        app.enter_dashboard();
        for c in "clima".chars() {
            app.push_search_char(c);
        }
        let screen = draw(&mut app, 200, 60);
        assert!(screen.contains("1 oportunidades"));
        assert!(screen.contains("EIT Climate-KIC Accelerator"));
    }

    #[test]
    fn test_overview_shows_active_search_and_status() {
        let mut app = app();
        app.enter_dashboard();

        press(&mut app, KeyCode::Char('/'));
        for c in "usaid".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(app.active_module, DashboardModule::Overview);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_filter, StatusFilter::Only(Status::New));
        assert_eq!(app.engine.visible_len(), 0);

        let screen = draw(&mut app, 200, 60);
        assert!(screen.contains("usaid"));
        assert!(screen.contains("Todas (4)"));
        assert!(screen.contains("Nuevas (1)"));
        assert!(screen.contains("No se encontraron oportunidades"));
    }
}
