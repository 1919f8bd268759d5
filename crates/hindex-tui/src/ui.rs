// UI rendering logic
use crate::help_ui::{centered_rect, render_keybindings_help};
use crate::view::{self, ViewModel};
use crate::{App, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

const ACCENT: Color = Color::Rgb(37, 99, 235);
const MUTED: Color = Color::Rgb(148, 163, 184);
const INK: Color = Color::Rgb(15, 23, 42);
const DANGER: Color = Color::Rgb(185, 28, 28);

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(8),    // Cards
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let compact = frame.area().width < app.ui.compact_width;
    if compact {
        // Narrow terminals stack the figure above the list and drop the chart
        let cards = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(5)])
            .split(chunks[1]);
        render_hindex_card(frame, &app.view, cards[0], true);
        render_list_card(frame, app, cards[1]);
    } else {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        render_list_card(frame, app, cards[0]);

        let stats = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(5)])
            .split(cards[1]);
        render_hindex_card(frame, &app.view, stats[0], false);
        render_chart_card(frame, &app.view, app.ui.bar_width, stats[1]);
    }

    render_status_bar(frame, app, chunks[2]);

    // Modals go on top of everything
    let area = frame.area();
    match app.input_mode {
        InputMode::Confirming => render_confirm_popup(frame, app, area),
        InputMode::Notice => render_notice_popup(frame, app, area),
        InputMode::NamingCollection | InputMode::RenamingCollection => {
            render_name_popup(frame, app, area)
        }
        InputMode::Help => render_keybindings_help(frame, area),
        _ => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            view::TITLE,
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(view::TAGLINE, Style::default().fg(MUTED))),
    ]);
    frame.render_widget(header, area);
}

fn render_list_card(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Articles ")
        .border_style(Style::default().fg(MUTED));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Collection tabs
            Constraint::Length(1), // Collection management hints
            Constraint::Min(2),    // Article table
            Constraint::Length(1), // Actions
        ])
        .split(inner);

    let tabs = Tabs::new(app.view.tabs.iter().map(|name| Line::from(name.as_str())))
        .select(app.view.active_tab)
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    frame.render_widget(
        hint_line(&[("n", "new"), ("r", "rename"), ("D", "delete"), ("Tab", "switch")]),
        chunks[1],
    );

    if app.view.is_empty() {
        let empty = Paragraph::new(Span::styled(
            view::EMPTY_MESSAGE,
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, chunks[2]);
    } else {
        render_article_table(frame, app, chunks[2]);
    }

    frame.render_widget(
        hint_line(&[
            ("a", "add article"),
            ("s", "add sample"),
            ("e", "download JSON"),
            ("C", "clear"),
            ("?", "help"),
        ]),
        chunks[3],
    );
}

fn render_article_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let editing_title = app.input_mode == InputMode::EditingTitle;
    let editing_citations = app.input_mode == InputMode::EditingCitations;

    let rows: Vec<Row> = app
        .view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == app.selected;

            let title = if selected && editing_title {
                editing_cell(&app.edit_buffer)
            } else if row.title.is_empty() {
                Cell::from(Span::styled(row.display_title(), Style::default().fg(MUTED)))
            } else {
                Cell::from(row.title.as_str())
            };

            let citations = if selected && editing_citations {
                editing_cell(&app.edit_buffer)
            } else {
                Cell::from(row.citations.to_string())
            };

            Row::new(vec![
                Cell::from(Span::styled(format!("{}.", row.number), Style::default().fg(MUTED))),
                title,
                citations,
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(4), Constraint::Min(10), Constraint::Length(10)],
    )
    .header(
        Row::new(vec!["#", "Title", "Citations"])
            .style(Style::default().fg(MUTED).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::Rgb(30, 41, 59)).add_modifier(Modifier::BOLD))
    .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn editing_cell(buffer: &str) -> Cell<'static> {
    Cell::from(Line::from(vec![
        Span::styled(buffer.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]))
}

fn hint_line(hints: &[(&str, &str)]) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(MUTED)));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", label), Style::default().fg(MUTED)));
    }
    Paragraph::new(Line::from(spans))
}

fn render_hindex_card(frame: &mut Frame, view: &ViewModel, area: Rect, compact: bool) {
    let mut lines = vec![
        Line::from(Span::styled(
            view.h_index.to_string(),
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(view.article_label.clone(), Style::default().fg(MUTED))),
    ];
    if compact && !view.sparkline.is_empty() {
        lines.push(Line::from(Span::styled(
            view.sparkline.clone(),
            Style::default().fg(ACCENT),
        )));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" H-index ")
            .border_style(Style::default().fg(MUTED)),
    );
    frame.render_widget(card, area);
}

fn render_chart_card(frame: &mut Frame, view: &ViewModel, bar_width: u16, area: Rect) {
    let bars: Vec<Bar> = view
        .bars
        .iter()
        .map(|bar| {
            let color = if bar.contributing { ACCENT } else { MUTED };
            Bar::default()
                .value(bar.citations)
                .text_value(bar.citations.to_string())
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::White).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Citation Distribution ")
                .border_style(Style::default().fg(MUTED)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(view.chart_max);

    frame.render_widget(chart, area);
}

fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.confirm_prompt.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(DANGER).add_modifier(Modifier::BOLD)),
            Span::raw(": yes   "),
            Span::styled("n", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw(": no"),
        ]),
    ];

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .border_style(Style::default().fg(DANGER)),
        );
    frame.render_widget(popup, popup_area);
}

fn render_notice_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let message = app.notice.clone().unwrap_or_default();
    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(MUTED))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Notice ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(popup, popup_area);
}

fn render_name_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let title = if app.input_mode == InputMode::NamingCollection {
        " New collection name (blank for automatic) "
    } else {
        " Rename collection "
    };

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.edit_buffer.clone(), Style::default().fg(Color::Yellow)),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(input, popup_area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(Color::Green))
    } else {
        match app.input_mode {
            InputMode::EditingTitle => Span::styled(
                "EDIT TITLE | Type to change | TAB: citations | ENTER/ESC: done",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::EditingCitations => Span::styled(
                "EDIT CITATIONS | Type a number | ENTER: add next article | TAB: title | ESC: done",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::NamingCollection | InputMode::RenamingCollection => Span::styled(
                "NAME | Type a name | ENTER: save | ESC: cancel",
                Style::default().fg(Color::Green),
            ),
            InputMode::Confirming => {
                Span::styled("CONFIRM | y: yes | n/ESC: no", Style::default().fg(DANGER))
            }
            InputMode::Notice => {
                Span::styled("NOTICE | any key: dismiss", Style::default().fg(Color::Yellow))
            }
            InputMode::Help => {
                Span::styled("HELP | ?/ESC: close", Style::default().fg(Color::Cyan))
            }
            InputMode::Normal => Span::raw(
                "j/k: navigate | a: add | x: remove | t: title | c: citations | TAB: collection | ?: help | q: quit",
            ),
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}
