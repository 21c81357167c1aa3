use gnotes::presenter::{Cell, Field, Presenter, PriorityClass, Row, NO_NOTES};
use gnotes::query::format_sort_keys;
use gnotes::session::{SessionController, SessionState, HELP};
use gnotes::store::{LocalCache, RemoteStore};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

const HINT: &str = "? help  :q quit  / search";

pub fn draw<R: RemoteStore, C: LocalCache>(f: &mut Frame<'_>, session: &SessionController<'_, R, C>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(67), Constraint::Percentage(33)])
        .split(rows[0]);

    draw_list(f, panes[0], session);
    draw_preview(f, panes[1], session);
    draw_bottom_bar(f, rows[1], session);

    if session.state() == SessionState::HelpOverlay {
        draw_help(f);
    }
}

fn list_title<R: RemoteStore, C: LocalCache>(session: &SessionController<'_, R, C>) -> String {
    let mut parts = vec![format!("gnotes ({})", session.visible_notes().len())];
    if let Some(tag) = session.tag_filter() {
        parts.push(format!("#{}", tag));
    }
    if !session.search().is_empty() {
        parts.push(format!("/{}", session.search()));
    }
    if session.shows_done() {
        parts.push("+done".to_string());
    }
    let keys = format_sort_keys(session.sort_keys());
    if !keys.is_empty() {
        parts.push(format!("sort {}", keys));
    }
    format!(" {} ", parts.join("  "))
}

fn class_style(class: PriorityClass) -> Style {
    match class {
        PriorityClass::High => Style::default().fg(Color::Red),
        PriorityClass::Mid => Style::default().fg(Color::Yellow),
        PriorityClass::Low => Style::default(),
    }
}

fn cell_style(cell: &Cell, row: &Row) -> Style {
    let style = match (cell.field, cell.class) {
        (Field::Id, _) => Style::default().fg(Color::Cyan),
        (Field::Done, _) => Style::default().fg(Color::Green),
        (_, Some(class)) => class_style(class),
        _ => Style::default(),
    };
    if row.done {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn row_line(row: &Row) -> Line<'static> {
    let mut spans = Vec::with_capacity(row.cells.len() * 2);
    for (i, cell) in row.cells.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(cell.text.clone(), cell_style(cell, row)));
    }
    Line::from(spans)
}

fn draw_list<R: RemoteStore, C: LocalCache>(
    f: &mut Frame<'_>,
    area: Rect,
    session: &SessionController<'_, R, C>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(session))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let notes = session.visible_notes();
    if notes.is_empty() {
        f.render_widget(Paragraph::new(NO_NOTES), inner);
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let presenter = Presenter::new(session.config(), inner.width as usize)
        .with_columns(session.columns());
    let max_id = session.max_id();

    let header = Line::from(presenter.header_plain(max_id))
        .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    f.render_widget(Paragraph::new(header), parts[0]);

    let items: Vec<ListItem> = presenter
        .rows(&notes, max_id)
        .iter()
        .map(|row| ListItem::new(row_line(row)))
        .collect();
    let mut state = ListState::default();
    if session.selected_note().is_some() {
        state.select(Some(session.selection_index()));
    }
    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, parts[1], &mut state);
}

fn draw_preview<R: RemoteStore, C: LocalCache>(
    f: &mut Frame<'_>,
    area: Rect,
    session: &SessionController<'_, R, C>,
) {
    let block = Block::default().borders(Borders::ALL).title(" note ");
    let Some(note) = session.selected_note() else {
        f.render_widget(block, area);
        return;
    };

    let presenter = Presenter::new(session.config(), area.width as usize)
        .with_columns(session.columns());
    let detail = presenter.render_detail(note);

    let mut lines = vec![
        Line::from(Span::styled(
            detail.title.clone(),
            class_style(detail.class).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    for (label, value) in &detail.fields {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>8}: ", label), Style::default().fg(Color::DarkGray)),
            Span::raw(value.clone()),
        ]));
    }
    lines.push(Line::default());
    lines.extend(detail.content.lines().map(|l| Line::from(l.to_string())));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_bottom_bar<R: RemoteStore, C: LocalCache>(
    f: &mut Frame<'_>,
    area: Rect,
    session: &SessionController<'_, R, C>,
) {
    match session.state() {
        SessionState::CommandEntry | SessionState::SearchEntry => {
            let cmd = session.cmd_line();
            f.render_widget(Paragraph::new(cmd.to_string()), area);
            let x = area.x + (cmd.chars().count() as u16).min(area.width.saturating_sub(1));
            f.set_cursor_position((x, area.y));
        }
        _ => {
            let line = match session.status() {
                Some(status) => Line::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(Color::Yellow),
                )),
                None => {
                    let mut spans = vec![Span::styled(HINT, Style::default().fg(Color::DarkGray))];
                    if session.has_unsaved_changes() {
                        spans.push(Span::styled(
                            "  [+] unsaved",
                            Style::default().fg(Color::Red),
                        ));
                    }
                    Line::from(spans)
                }
            };
            f.render_widget(Paragraph::new(line), area);
        }
    }
}

fn draw_help(f: &mut Frame<'_>) {
    let area = centered_rect(60, 70, f.area());
    let width = HELP.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", key, width = width),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(*description),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" help (Esc to close) "),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

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
