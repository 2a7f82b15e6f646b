// UI rendering logic
use crate::app::Screen;
use crate::{App, InputMode};
use grantinsight_core::dashboard::{DashboardModule, PlaceholderPanel, SidebarTool, LANDING};
use grantinsight_core::theme::Tone;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 28;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 7;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let background = Block::default().style(
        Style::default()
            .bg(to_color(app.theme.colors.background))
            .fg(to_color(app.theme.colors.foreground)),
    );
    frame.render_widget(background, area);

    match app.screen {
        Screen::Landing => render_landing(frame, app, area),
        Screen::Dashboard => render_dashboard(frame, app, area),
    }

    if app.show_help {
        crate::help_ui::render_keybindings_help(frame, app, area);
    }
}

/// Core theme color to terminal color
pub(crate) fn to_color(color: grantinsight_core::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub(crate) fn tone_color(app: &App, tone: Tone) -> Color {
    to_color(app.theme.colors.tone(tone))
}

fn render_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Sidebar + module
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let sidebar_width = if app.sidebar_collapsed {
        SIDEBAR_COLLAPSED_WIDTH
    } else {
        SIDEBAR_WIDTH
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(rows[0]);

    render_sidebar(frame, app, columns[0]);

    match app.active_module {
        DashboardModule::Overview => crate::overview_ui::render_overview(frame, app, columns[1]),
        DashboardModule::Active => crate::opportunities_ui::render_active_module(frame, app, columns[1]),
        module => {
            if let Some(panel) = module.placeholder() {
                render_placeholder(frame, app, &panel, columns[1]);
            }
        }
    }

    render_status_bar(frame, app, rows[1]);
}

fn render_landing(frame: &mut Frame, app: &App, area: Rect) {
    let primary = tone_color(app, Tone::Primary);
    let secondary = tone_color(app, Tone::Secondary);
    let muted = tone_color(app, Tone::Muted);
    let title = to_color(app.theme.colors.title);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("◆ {}", LANDING.product),
            Style::default().fg(primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", LANDING.badge),
            Style::default().fg(secondary).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(Span::styled(
            LANDING.headline,
            Style::default().fg(title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(LANDING.tagline, Style::default().fg(muted))),
        Line::from(""),
        Line::from(Span::styled(
            LANDING.features_heading,
            Style::default().fg(title).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
    ];

    for feature in LANDING.features.iter() {
        lines.push(Line::from(vec![
            Span::styled(feature.title, Style::default().fg(primary).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("[{}]", feature.highlight), Style::default().fg(secondary)),
        ]));
        lines.push(Line::from(Span::styled(feature.description, Style::default().fg(muted))));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {} → ", LANDING.call_to_action),
            Style::default()
                .fg(to_color(app.theme.colors.background))
                .bg(primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "ENTER: entrar | ?: ayuda | q: salir",
        Style::default().fg(muted),
    )));

    let landing = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(to_color(app.theme.colors.border))),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(landing, area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let accent = to_color(colors.sidebar_accent);
    let muted = tone_color(app, Tone::Muted);
    let collapsed = app.sidebar_collapsed;

    let mut lines = vec![
        if collapsed {
            Line::from(Span::styled(" ◆", Style::default().fg(accent).add_modifier(Modifier::BOLD)))
        } else {
            Line::from(Span::styled(
                format!(" ◆ {}", LANDING.product),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
        },
        Line::from(""),
    ];

    if !collapsed {
        lines.push(Line::from(Span::styled(" MÓDULOS", Style::default().fg(muted))));
    }

    for (i, module) in DashboardModule::ALL.iter().enumerate() {
        let is_active = *module == app.active_module;
        let style = if is_active {
            Style::default()
                .fg(to_color(colors.background))
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(to_color(colors.foreground))
        };

        let text = if collapsed {
            format!(" {} {}", i + 1, module.icon())
        } else {
            format!(" {} {} {}", i + 1, module.icon(), module.label())
        };
        lines.push(Line::from(Span::styled(text, style)));

        if is_active && !collapsed {
            lines.push(Line::from(Span::styled(
                format!("     {}", module.description()),
                Style::default().fg(muted).add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines.push(Line::from(""));
    if !collapsed {
        lines.push(Line::from(Span::styled(" HERRAMIENTAS", Style::default().fg(muted))));
    }
    for tool in SidebarTool::ALL {
        let text = if collapsed {
            format!("   {}", tool.icon())
        } else {
            format!(" {} {}", tool.icon(), tool.label())
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(muted))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if collapsed { " [»]" } else { " [«] Contraer" },
        Style::default().fg(muted),
    )));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(to_color(colors.border)))
            .style(Style::default().bg(to_color(colors.sidebar))),
    );

    frame.render_widget(sidebar, area);
}

fn render_placeholder(frame: &mut Frame, app: &App, panel: &PlaceholderPanel, area: Rect) {
    let muted = tone_color(app, Tone::Muted);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", panel.badge),
            Style::default().fg(tone_color(app, Tone::Secondary)),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            panel.title,
            Style::default()
                .fg(to_color(app.theme.colors.title))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(panel.message, Style::default().fg(muted))),
    ];

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", panel.heading))
                .border_style(Style::default().fg(to_color(app.theme.colors.border))),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error_message {
        Span::styled(error.as_str(), Style::default().fg(tone_color(app, Tone::Danger)))
    } else if let Some(message) = &app.status_message {
        Span::styled(message.as_str(), Style::default().fg(tone_color(app, Tone::Secondary)))
    } else {
        match app.input_mode {
            InputMode::Searching => Span::styled(
                "BUSCAR | escribe para filtrar | ENTER/ESC: volver",
                Style::default().fg(tone_color(app, Tone::Warning)),
            ),
            InputMode::Normal => Span::raw(
                "1-5/TAB: módulos | /: buscar | s/S: estado | j/k: mover | e: exportar | [: barra | ?: ayuda | q: salir",
            ),
        }
    };

    let paragraph = Paragraph::new(Line::from(status))
        .style(Style::default().fg(to_color(app.theme.colors.subtitle)));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::App;
    use chrono::NaiveDate;
    use grantinsight_core::{Config, FilterEngine, FixtureSource, OpportunityRepository};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    pub fn app() -> App {
        let repo = OpportunityRepository::from_source(&FixtureSource).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        App::new(FilterEngine::new(repo), &Config::default(), today).unwrap()
    }

    pub fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| super::render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
