//! Main (and only) screen: bullet-point form, drafted email, and status

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::{Theme, borders};
use super::widgets::{help_bar, sanitize_text, spinner_char, status_line, truncate_string};
use crate::app::state::{AppState, EditorState};
use crate::constants::{CONTENT_PADDING_H, ERROR_PANEL_HEIGHT, INPUT_MIN_HEIGHT, OUTPUT_MIN_HEIGHT};
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "Email Draft Assistant";
const SUBTITLE: &str = "Turn your bullet points into a professional email";
const PLACEHOLDER: &str = "• Need to schedule a meeting\n• Discuss Q2 results\n• Request budget approval\n• Follow up on previous action items";

/// Editor grows with its content up to this many rows once an email is shown
const INPUT_MAX_HEIGHT: u16 = 12;

struct ScreenLayout {
    header: Rect,
    editor: Rect,
    field_error: Option<Rect>,
    submit: Rect,
    output: Option<Rect>,
    error_panel: Option<Rect>,
    status: Rect,
    help: Rect,
}

fn compute_layout(area: Rect, state: &AppState) -> ScreenLayout {
    let form = state.drafter.form_state();
    let has_field_error = !state.bullet_point_errors().is_empty();
    let has_email = form.email.is_some();
    let has_error = form.error_message().is_some();

    let editor_constraint = if has_email {
        let rows = state.editor.text.lines().count() as u16 + 2;
        Constraint::Length(rows.clamp(INPUT_MIN_HEIGHT, INPUT_MAX_HEIGHT))
    } else {
        Constraint::Min(INPUT_MIN_HEIGHT)
    };

    let mut constraints = vec![
        Constraint::Length(3), // Header + subtitle + gap
        editor_constraint,
    ];
    if has_field_error {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(2)); // Submit button + gap
    if has_email {
        constraints.push(Constraint::Min(OUTPUT_MIN_HEIGHT));
    }
    if has_error {
        constraints.push(Constraint::Length(ERROR_PANEL_HEIGHT));
    }
    constraints.push(Constraint::Length(1)); // Status
    constraints.push(Constraint::Length(1)); // Help bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = chunks.iter().copied();
    let mut take = || next.next().unwrap_or_default();

    let header = take();
    let editor = take();
    let field_error = has_field_error.then(&mut take);
    let submit = take();
    let output = has_email.then(&mut take);
    let error_panel = has_error.then(&mut take);
    let status = take();
    let help = take();

    ScreenLayout {
        header,
        editor,
        field_error,
        submit,
        output,
        error_panel,
        status,
        help,
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let full = frame.area();
    frame.render_widget(Block::default().style(Theme::main_bg()), full);

    // Status and help span the full width; content is padded
    let body = full.inner(Margin {
        horizontal: CONTENT_PADDING_H,
        vertical: 0,
    });
    let layout = compute_layout(body, state);

    render_header(frame, layout.header, state);
    render_editor(frame, layout.editor, state);

    if let Some(area) = layout.field_error {
        let text = state.bullet_point_errors().join(" ");
        frame.render_widget(Paragraph::new(text).style(Theme::text_error()), area);
    }

    render_submit(frame, layout.submit, state);

    if let Some(area) = layout.output {
        render_output(frame, area, state);
    }

    if let (Some(area), Some(message)) =
        (layout.error_panel, state.drafter.form_state().error_message())
    {
        render_error_panel(frame, area, message);
    }

    let status = Rect {
        x: full.x,
        width: full.width,
        ..layout.status
    };
    let help = Rect {
        x: full.x,
        width: full.width,
        ..layout.help
    };
    status_line(frame, status, &state.status);
    help_bar(frame, help, &state.hints);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let meta = format!(
        "Powered by {} · Theme: {}",
        truncate_string(&state.model, 32),
        state.theme.name()
    );
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(meta.width() as u16)])
        .split(rows[0]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(TITLE, Theme::title()))),
        top[0],
    );
    frame.render_widget(
        Paragraph::new(meta)
            .style(Theme::text_muted())
            .alignment(Alignment::Right),
        top[1],
    );

    frame.render_widget(
        Paragraph::new(SUBTITLE).style(Theme::text_secondary()),
        rows[1],
    );
}

/// Editor text with an inline cursor glyph
fn editor_lines(editor: &EditorState) -> Vec<Line<'static>> {
    if editor.text.is_empty() {
        let mut lines = vec![Line::from(vec![
            Span::styled("│", Theme::text_accent()),
            Span::styled(
                PLACEHOLDER.lines().next().unwrap_or_default(),
                Theme::text_muted(),
            ),
        ])];
        lines.extend(
            PLACEHOLDER
                .lines()
                .skip(1)
                .map(|l| Line::from(Span::styled(l, Theme::text_muted()))),
        );
        return lines;
    }

    let (before, after) = editor.text.split_at(editor.cursor);
    let before_lines: Vec<&str> = before.split('\n').collect();
    let after_lines: Vec<&str> = after.split('\n').collect();
    let last_before = before_lines.len() - 1;

    let mut lines: Vec<Line<'static>> = before_lines[..last_before]
        .iter()
        .map(|l| Line::from(Span::styled(l.to_string(), Theme::text())))
        .collect();

    lines.push(Line::from(vec![
        Span::styled(before_lines[last_before].to_string(), Theme::text()),
        Span::styled("│", Theme::text_accent()),
        Span::styled(after_lines[0].to_string(), Theme::text()),
    ]));

    lines.extend(
        after_lines[1..]
            .iter()
            .map(|l| Line::from(Span::styled(l.to_string(), Theme::text()))),
    );
    lines
}

/// Rows a line occupies once wrapped to `width` columns
fn wrapped_rows(line: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    line.width().div_ceil(width).max(1) as u16
}

/// Wrapped row holding the cursor glyph, counted from the top of the editor
fn cursor_row(editor: &EditorState, width: u16) -> u16 {
    let (line, before_cursor) = editor.cursor_line();
    let rows_above: u16 = editor
        .text
        .split('\n')
        .take(line)
        .map(|l| wrapped_rows(l, width))
        .sum();
    // The glyph itself takes one column after the text before it
    rows_above + wrapped_rows(&format!("{}│", before_cursor), width) - 1
}

fn render_editor(frame: &mut Frame, area: Rect, state: &AppState) {
    let has_error = !state.bullet_point_errors().is_empty();
    let border_style = if has_error {
        Theme::border_error()
    } else {
        Theme::border_focused()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::input_focused())
        .border_style(border_style)
        .title(Span::styled(" Bullet Points ", Theme::label()));

    let inner = block.inner(area);
    let row = cursor_row(&state.editor, inner.width);
    let scroll = row.saturating_sub(inner.height.saturating_sub(1));

    let paragraph = Paragraph::new(editor_lines(&state.editor))
        .block(block)
        .style(Theme::text())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_submit(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if state.drafter.is_pending() {
        Line::from(vec![
            Span::styled(format!(" {} ", spinner_char()), Theme::text_accent()),
            Span::styled("Drafting Email...", Theme::button_disabled()),
        ])
    } else {
        Line::from(vec![
            Span::styled(" Convert to Email ", Theme::button()),
            Span::styled("  Ctrl+S", Theme::text_muted()),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_output(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(email) = state.drafter.form_state().email.as_deref() else {
        return;
    };

    let copy = if state.is_copied() {
        Span::styled(" ✓ Copied! ", Theme::text_success())
    } else {
        Span::styled(" Copy to Clipboard (Ctrl+Y) ", Theme::text_accent())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(" Drafted Email ", Theme::label()))
        .title_top(Line::from(copy).right_aligned());

    let paragraph = Paragraph::new(sanitize_text(email))
        .block(block)
        .style(Theme::text())
        .wrap(Wrap { trim: false })
        .scroll((state.output_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_error_panel(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border_error());

    let paragraph = Paragraph::new(message)
        .block(block)
        .style(Theme::text_error())
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
