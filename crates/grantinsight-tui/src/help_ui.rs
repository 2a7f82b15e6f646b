use crate::ui::{to_color, tone_color};
use crate::App;
use grantinsight_core::theme::Tone;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render keybindings help popup
pub fn render_keybindings_help(frame: &mut Frame, app: &App, area: Rect) {
    // Create centered popup (60% width, 80% height)
    let popup_area = centered_rect(60, 80, area);

    // Clear background
    frame.render_widget(Clear, popup_area);

    let bg_color = to_color(app.theme.colors.background);
    let fg_color = to_color(app.theme.colors.foreground);
    let primary_color = tone_color(app, Tone::Primary);
    let accent_color = tone_color(app, Tone::Secondary);
    let muted_color = tone_color(app, Tone::Muted);

    let keybindings = get_keybindings_content(primary_color, accent_color, fg_color, muted_color);

    let help_text = Paragraph::new(keybindings)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Atajos de Teclado ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(primary_color))
                .style(Style::default().bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .alignment(Alignment::Left);

    frame.render_widget(help_text, popup_area);

    // Footer on the bottom border
    if popup_area.height > 2 && popup_area.width > 2 {
        let help_area = Rect {
            x: popup_area.x + 1,
            y: popup_area.y + popup_area.height - 1,
            width: popup_area.width - 2,
            height: 1,
        };

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Pulsa ", Style::default().fg(muted_color)),
            Span::styled("? ", Style::default().fg(accent_color).add_modifier(Modifier::BOLD)),
            Span::styled("o ", Style::default().fg(muted_color)),
            Span::styled("ESC ", Style::default().fg(accent_color).add_modifier(Modifier::BOLD)),
            Span::styled("para cerrar", Style::default().fg(muted_color)),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg_color));

        frame.render_widget(footer, help_area);
    }
}

/// Get all keybindings content as styled lines
fn get_keybindings_content(
    primary: Color,
    accent: Color,
    fg: Color,
    muted: Color,
) -> Vec<Line<'static>> {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            format!("  {}", title),
            Style::default().fg(primary).add_modifier(Modifier::BOLD),
        )])
    };
    let key = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(
                format!("    {:<12}", keys),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc, Style::default().fg(fg)),
        ])
    };

    let mut lines = vec![Line::from("")];

    lines.push(section("General"));
    lines.push(key("ENTER", "Acceder al dashboard (pantalla inicial)"));
    lines.push(key("?", "Mostrar u ocultar esta ayuda"));
    lines.push(key("ESC", "Volver a la pantalla inicial"));
    lines.push(key("q / Ctrl+C", "Salir"));
    lines.push(Line::from(""));

    lines.push(section("Navegación"));
    lines.push(key("1 - 5", "Ir al módulo"));
    lines.push(key("TAB / S-TAB", "Módulo siguiente / anterior"));
    lines.push(key("[", "Contraer o expandir la barra lateral"));
    lines.push(key("j / k", "Mover la selección"));
    lines.push(Line::from(""));

    lines.push(section("Filtros"));
    lines.push(key("/", "Buscar por título, organización o etiqueta"));
    lines.push(key("s / S", "Estado siguiente / anterior"));
    lines.push(key("c", "Limpiar búsqueda y estado"));
    lines.push(Line::from(""));

    lines.push(section("Reportes"));
    lines.push(key("e", "Exportar las oportunidades visibles"));
    lines.push(key("r", "Recargar la fuente de datos"));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![Span::styled(
        "  El formato del reporte sigue la extensión: .md, .csv o .json",
        Style::default().fg(muted).add_modifier(Modifier::ITALIC),
    )]));

    lines
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{app, draw};

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 80, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 40);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 5);
    }

    #[test]
    fn test_help_overlay_renders() {
        let mut app = app();
        app.enter_dashboard();
        app.toggle_help();
        let screen = draw(&mut app, 120, 40);
        assert!(screen.contains("Atajos de Teclado"));
        assert!(screen.contains("Exportar las oportunidades visibles"));
    }
}
