use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::storage::SlotBackend;
use crate::task::{Filter, Task};

use super::app::{AppState, Focus, HitAreas, StatusKind};
use super::model::{self, Row};
use super::surface::Surface;

pub(crate) const CHECKBOX_WIDTH: u16 = 3;
pub(crate) const DELETE_LABEL: &str = "[del]";
const CLEAR_LABEL: &str = "clear completed";
const HELP_KEY_WIDTH: usize = 14;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);

/// Rebuild the row list for `filter`
pub fn render(tasks: &[Task], filter: Filter, surface: &mut impl Surface) {
    surface.clear_list();
    for row in model::build_rows(tasks, filter) {
        surface.append_row(row);
    }
}

/// Refresh the "N tasks left" label from the whole list
pub fn update_count(tasks: &[Task], surface: &mut impl Surface) {
    surface.set_count(&model::count_label(model::active_count(tasks)));
}

pub fn draw<S: SlotBackend>(frame: &mut Frame, app: &mut AppState<S>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let mut hits = HitAreas::default();
    draw_input(frame, app, chunks[0], &mut hits);
    draw_filters(frame, app, chunks[1], &mut hits);
    draw_list(frame, app, chunks[2], &mut hits);
    draw_footer(frame, app, chunks[3]);
    app.hits = hits;
}

fn draw_input<S: SlotBackend>(frame: &mut Frame, app: &AppState<S>, area: Rect, hits: &mut HitAreas) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("What needs to be done?")
        .border_style(Style::default().fg(if focused {
            COLOR_ACCENT
        } else {
            COLOR_BG_MUTED
        }));
    let inner = block.inner(area);
    hits.input = inner;

    let value = app.surface.input();
    let width = inner.width as usize;
    let line = if focused {
        let visible = tail_text(value, width.saturating_sub(1));
        Line::from(vec![
            Span::styled(visible, Style::default().fg(COLOR_TEXT)),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ])
    } else if value.is_empty() {
        Line::from(Span::styled(
            "press i to add a task",
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    } else {
        Line::from(Span::styled(
            tail_text(value, width),
            Style::default().fg(COLOR_MUTED),
        ))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_filters<S: SlotBackend>(
    frame: &mut Frame,
    app: &AppState<S>,
    area: Rect,
    hits: &mut HitAreas,
) {
    let active = app.surface.active_filter();
    let mut spans = vec![Span::raw(" ")];
    let mut x = area.x.saturating_add(1);
    for (idx, filter) in Filter::ALL.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default().fg(COLOR_MUTED_DARK)));
            x = x.saturating_add(2);
        }
        let label = format!("{} {}", idx + 1, filter_title(filter));
        let width = label.width() as u16;
        hits.tabs
            .push((filter, Rect::new(x, area.y, width, 1).intersection(area)));
        x = x.saturating_add(width);

        let style = if filter == active {
            Style::default()
                .fg(COLOR_INFO)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let clear_width = CLEAR_LABEL.len() as u16 + 1;
    if area.width > x.saturating_sub(area.x) + clear_width {
        let rect = Rect::new(
            area.x + area.width - clear_width,
            area.y,
            clear_width - 1,
            1,
        );
        hits.clear = Some(rect);
        let any_completed = app
            .controller
            .store()
            .snapshot()
            .iter()
            .any(|task| task.completed);
        let style = if any_completed {
            Style::default().fg(COLOR_WARNING)
        } else {
            Style::default().fg(COLOR_MUTED_DARK)
        };
        let widget = Paragraph::new(Span::styled(CLEAR_LABEL, style)).alignment(Alignment::Right);
        frame.render_widget(widget, rect);
    }
}

fn draw_list<S: SlotBackend>(frame: &mut Frame, app: &AppState<S>, area: Rect, hits: &mut HitAreas) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "Tasks ({})",
            filter_title(app.surface.active_filter())
        ))
        .border_style(Style::default().fg(if app.focus == Focus::List {
            COLOR_BORDER_LIST
        } else {
            COLOR_BG_MUTED
        }));
    let inner = block.inner(area);
    let width = inner.width as usize;
    let help_lines = if app.show_help {
        build_help_lines(width)
    } else {
        Vec::new()
    };
    let help_reserved = if help_lines.is_empty() {
        0
    } else {
        help_lines.len() + 1
    };

    let mut lines = Vec::new();
    let rows = app.surface.rows();
    if rows.is_empty() {
        let message = match app.surface.active_filter() {
            Filter::All => "No tasks",
            Filter::Active => "Nothing left to do",
            Filter::Completed => "Nothing completed yet",
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    } else {
        let height = (inner.height as usize).saturating_sub(help_reserved);
        let (start, end) = model::list_window(rows.len(), app.cursor, height);
        hits.list = Rect::new(inner.x, inner.y, inner.width, (end - start) as u16);
        hits.list_start = start;
        let dragging = app.controller.drag_source().is_some();
        for (pos, row) in rows.iter().enumerate().take(end).skip(start) {
            let selected = app.focus == Focus::List && app.cursor == Some(pos);
            let dimmed = app.surface.is_dimmed(row.id);
            lines.push(render_row(row, selected, dimmed, dragging, width));
        }
    }

    if !help_lines.is_empty() {
        lines.push(Line::from(""));
        lines.extend(help_lines);
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer<S: SlotBackend>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let count_line = Line::from(Span::styled(
        app.surface.count().to_string(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, count_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn render_row(row: &Row, selected: bool, dimmed: bool, dragging: bool, width: usize) -> Line<'static> {
    let delete_width = DELETE_LABEL.len() + 1;
    let text_width = width.saturating_sub(CHECKBOX_WIDTH as usize + 1 + delete_width);
    let text = pad_text(&row.text, text_width);

    let checkbox_style = if row.completed {
        Style::default().fg(COLOR_SUCCESS).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_MUTED)
    };
    let text_style = if row.completed {
        Style::default()
            .fg(COLOR_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };
    let delete_style = if dragging {
        Style::default().fg(COLOR_MUTED_DARK)
    } else {
        Style::default().fg(COLOR_ERROR)
    };

    let mut spans = vec![
        Span::styled(row.checkbox(), checkbox_style),
        Span::raw(" "),
        Span::styled(text, text_style),
        Span::raw(" "),
        Span::styled(DELETE_LABEL, delete_style),
    ];
    if dimmed {
        for span in &mut spans {
            span.style = span
                .style
                .fg(COLOR_MUTED_DARK)
                .add_modifier(Modifier::DIM);
        }
    }
    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn build_help_lines(width: usize) -> Vec<Line<'static>> {
    vec![
        help_header("More commands"),
        help_line("j/k or up/down", "move cursor", width),
        help_line("space/x", "toggle completed", width),
        help_line("d/delete", "delete task", width),
        help_line("C", "clear completed", width),
        help_line("1/2/3", "show all/active/completed", width),
        help_line("f", "cycle filter", width),
        help_line("m", "pick up task, m/enter drops", width),
        help_line("i/a or tab", "new task", width),
        help_line("mouse", "drag rows, click [ ] or [del]", width),
        help_line("q/esc", "quit", width),
        help_line("?", "hide help", width),
    ]
}

fn help_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
    ))
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(COLOR_MUTED)),
    ])
}

fn filter_title(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

/// Control characters (newlines, tabs) would break the one-line row layout
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Truncate and pad to exactly `width` terminal columns
fn pad_text(value: &str, width: usize) -> String {
    let text = truncate_text(value, width);
    let used = text.width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

/// At most `max` columns wide; wide characters are never split
fn truncate_text(value: &str, max: usize) -> String {
    let value = single_line(value);
    if value.width() <= max {
        return value;
    }
    let (budget, ellipsis) = if max > 3 { (max - 3, "...") } else { (max, "") };
    let mut out = String::new();
    let mut used = 0;
    for ch in value.chars() {
        let w = char_width(ch);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ellipsis);
    out
}

/// Last `max` columns, so the caret end of a long input stays visible
fn tail_text(value: &str, max: usize) -> String {
    let value = single_line(value);
    let mut used = 0;
    let mut start = value.len();
    for (idx, ch) in value.char_indices().rev() {
        let w = char_width(ch);
        if used + w > max {
            break;
        }
        used += w;
        start = idx;
    }
    value[start..].to_string()
}
