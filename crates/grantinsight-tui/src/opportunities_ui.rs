// Opportunity cards, status tabs and the search box
use crate::ui::{to_color, tone_color};
use crate::{App, InputMode};
use grantinsight_core::display::OpportunityCardView;
use grantinsight_core::theme::Tone;
use grantinsight_core::StatusFilter;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub const EMPTY_MESSAGE: &str =
    "No se encontraron oportunidades que coincidan con los filtros seleccionados.";

/// The "Activas" module: search, status tabs and the card list
pub fn render_active_module(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Length(3), // Status tabs
            Constraint::Min(5),    // Cards
        ])
        .split(area);

    render_search_input(frame, app, chunks[0]);
    render_status_tabs(frame, app, chunks[1]);
    render_opportunity_list(frame, app, chunks[2]);
}

pub(crate) fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Searching;
    let input_style = if searching {
        Style::default().fg(tone_color(app, Tone::Warning))
    } else {
        Style::default().fg(to_color(app.theme.colors.foreground))
    };

    let (text, text_style) = if app.search_input.is_empty() && !searching {
        (
            "Buscar oportunidades...",
            Style::default().fg(tone_color(app, Tone::Muted)),
        )
    } else {
        (app.search_input.as_str(), input_style)
    };

    let input = Paragraph::new(text).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Buscar (/ para escribir, ESC para salir) ")
            .border_style(if searching {
                input_style
            } else {
                Style::default().fg(to_color(app.theme.colors.border))
            }),
    );

    frame.render_widget(input, area);

    if searching {
        frame.set_cursor_position(search_cursor(area, &app.search_input));
    }
}

/// Cursor just past the typed text, kept inside the box's borders
fn search_cursor(area: Rect, input: &str) -> (u16, u16) {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let last_column = area.right().saturating_sub(2).max(area.x.saturating_add(1));
    let x = area.x.saturating_add(1).saturating_add(typed).min(last_column);
    (x, area.y.saturating_add(1))
}

/// Tab row, one entry per status filter with its repository-wide count
pub(crate) fn render_status_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.engine.counts();
    let colors = &app.theme.colors;

    let mut spans = Vec::with_capacity(StatusFilter::TABS.len() * 2);
    for tab in StatusFilter::TABS {
        let style = if tab == app.status_filter {
            Style::default()
                .fg(to_color(colors.background))
                .bg(to_color(colors.tab_active))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(to_color(colors.tab_inactive))
        };
        spans.push(Span::styled(
            format!(" {} ({}) ", tab.label(), counts.get(tab)),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let tabs = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Estado (s/S) ")
            .border_style(Style::default().fg(to_color(colors.border))),
    );
    frame.render_widget(tabs, area);
}

/// Card list over the engine's visible subset, shared by overview and "Activas"
pub fn render_opportunity_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let visible = app.engine.visible_len();
    let title = format!(" Convocatorias Activas · {} oportunidades ", visible);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(to_color(app.theme.colors.border)));

    if visible == 0 {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_MESSAGE,
                Style::default().fg(tone_color(app, Tone::Muted)),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem<'static>> = {
        let cards = app.visible_cards();
        cards.iter().map(|card| card_item(app, card, width)).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(to_color(app.theme.colors.selected_bg))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn card_item(app: &App, card: &OpportunityCardView<'_>, width: usize) -> ListItem<'static> {
    let opp = card.opportunity;
    let colors = &app.theme.colors;
    let muted = tone_color(app, Tone::Muted);
    let foreground = to_color(colors.foreground);

    let title_style = if card.highlighted {
        Style::default()
            .fg(tone_color(app, Tone::Danger))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(to_color(colors.title)).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", opp.priority.symbol()),
            Style::default().fg(tone_color(app, opp.priority.tone())),
        ),
        Span::styled(opp.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", opp.status.label()),
            Style::default()
                .fg(to_color(colors.background))
                .bg(tone_color(app, opp.status.tone())),
        ),
    ])];

    lines.push(Line::from(Span::styled(
        format!("  {}", opp.organization),
        Style::default().fg(to_color(colors.subtitle)),
    )));

    if let Some(banner) = &card.banner {
        lines.push(Line::from(Span::styled(
            format!("  ⚠ {}", banner.message()),
            Style::default()
                .fg(tone_color(app, banner.tone()))
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(vec![
        Span::styled(format!("  {}", opp.amount), Style::default().fg(tone_color(app, Tone::Secondary))),
        Span::styled("  ·  ", Style::default().fg(muted)),
        Span::styled(format!("▦ {}", card.deadline_label), Style::default().fg(foreground)),
        Span::styled("  ·  ", Style::default().fg(muted)),
        Span::styled(opp.region.clone(), Style::default().fg(foreground)),
        Span::styled("  ·  ", Style::default().fg(muted)),
        Span::styled(opp.category.clone(), Style::default().fg(foreground)),
    ]));

    if !opp.description.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate(&opp.description, width)),
            Style::default().fg(muted),
        )));
    }

    let mut tag_spans = vec![Span::raw("  ")];
    for tag in card.tags.shown {
        tag_spans.push(Span::styled(
            format!("[{}]", tag),
            Style::default().fg(tone_color(app, Tone::Primary)),
        ));
        tag_spans.push(Span::raw(" "));
    }
    if let Some(badge) = card.tags.overflow_badge() {
        tag_spans.push(Span::styled(badge, Style::default().fg(muted)));
    }
    tag_spans.push(Span::raw("   "));
    tag_spans.push(Span::styled(
        format!("[ {} ]", card.action_label),
        if card.primary_action {
            Style::default()
                .fg(to_color(colors.background))
                .bg(tone_color(app, Tone::Primary))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(foreground)
        },
    ));
    lines.push(Line::from(tag_spans));
    lines.push(Line::from(""));

    ListItem::new(lines)
}

/// Cut at a char boundary and mark the cut with "..."
fn truncate(text: &str, max_chars: usize) -> String {
    if max_chars < 4 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{app, draw};
    use grantinsight_core::dashboard::DashboardModule;
    use grantinsight_core::Status;

    fn active_app() -> App {
        let mut app = app();
        app.enter_dashboard();
        app.select_module(DashboardModule::Active);
        app
    }

    #[test]
    fn test_tabs_show_repository_counts() {
        let mut app = active_app();
        let screen = draw(&mut app, 160, 50);
        assert!(screen.contains("Todas (4)"));
        assert!(screen.contains("Nuevas (1)"));
        assert!(screen.contains("Presentadas (1)"));

        // Search narrows the list, never the tab counts
        for c in "usaid".chars() {
            app.push_search_char(c);
        }
        let screen = draw(&mut app, 160, 50);
        assert!(screen.contains("Todas (4)"));
        assert!(screen.contains("1 oportunidades"));
    }

    #[test]
    fn test_cards_show_derived_values() {
        let mut app = active_app();
        let screen = draw(&mut app, 160, 60);
        assert!(screen.contains("¡Fecha límite urgente!"));
        assert!(screen.contains("15/4/2024"));
        assert!(screen.contains("+1"));
        assert!(screen.contains("[ Evaluar ]"));
        assert!(screen.contains("[ Ver Detalles ]"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut app = active_app();
        app.set_status_filter(StatusFilter::Only(Status::Preparing));
        for c in "zzz".chars() {
            app.push_search_char(c);
        }
        let screen = draw(&mut app, 160, 40);
        assert!(screen.contains("No se encontraron oportunidades"));
    }

    #[test]
    fn test_search_cursor_stays_inside_box() {
        let area = Rect::new(30, 2, 40, 3);
        assert_eq!(search_cursor(area, ""), (31, 3));
        assert_eq!(search_cursor(area, "usaid"), (36, 3));
        assert_eq!(search_cursor(area, &"x".repeat(100)), (68, 3));
        assert_eq!(search_cursor(area, &"x".repeat(70_000)), (68, 3));

        let edge = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(search_cursor(edge, "abcdefghij"), (u16::MAX - 2, 1));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Investigación", 20), "Investigación");
        assert_eq!(truncate("Investigación avanzada", 10), "Investi...");
    }
}
