use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const ACCENT: Color = Color::Rgb(37, 99, 235);
const MUTED: Color = Color::Rgb(100, 116, 139);

/// Render keybindings help popup
pub fn render_keybindings_help(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    // Clear background
    frame.render_widget(Clear, popup_area);

    let help_text = Paragraph::new(keybindings_content())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keybindings Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(ACCENT)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_text, popup_area);

    // Footer on the bottom border
    if popup_area.height > 2 {
        let help_area = Rect {
            x: popup_area.x + 1,
            y: popup_area.y + popup_area.height - 1,
            width: popup_area.width.saturating_sub(2),
            height: 1,
        };

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(MUTED)),
            Span::styled("? ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled("or ", Style::default().fg(MUTED)),
            Span::styled("ESC ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled("to close", Style::default().fg(MUTED)),
        ]))
        .alignment(Alignment::Center);

        frame.render_widget(footer, help_area);
    }
}

/// All keybindings as styled lines
fn keybindings_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let section = |title: &str| -> Line<'static> {
        Line::from(vec![Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )])
    };

    let key = |k: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:14}", k),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(desc.to_string()),
        ])
    };

    lines.push(section("Articles"));
    lines.push(Line::from(""));
    lines.push(key("j/k, ↑/↓", "Move selection"));
    lines.push(key("a", "Add article"));
    lines.push(key("s", "Add sample article"));
    lines.push(key("x, Del", "Remove selected article"));
    lines.push(key("Enter, t", "Edit title"));
    lines.push(key("c", "Edit citations (Enter adds another)"));
    lines.push(key("Tab", "Jump between title and citations"));
    lines.push(key("Esc", "Stop editing"));
    lines.push(Line::from(""));

    lines.push(section("Collections"));
    lines.push(Line::from(""));
    lines.push(key("Tab, ]", "Next collection"));
    lines.push(key("Shift+Tab, [", "Previous collection"));
    lines.push(key("n", "New collection"));
    lines.push(key("r", "Rename collection"));
    lines.push(key("D", "Delete collection"));
    lines.push(key("C", "Clear all articles"));
    lines.push(Line::from(""));

    lines.push(section("Global"));
    lines.push(Line::from(""));
    lines.push(key("e", "Export JSON"));
    lines.push(key("?", "Toggle this help"));
    lines.push(key("q, Ctrl+C", "Quit"));

    lines
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn test_every_key_is_listed() {
        let text: String = keybindings_content()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for desc in ["Add sample article", "Delete collection", "Export JSON", "Quit"] {
            assert!(text.contains(desc), "{desc}");
        }
    }
}
