use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

/// Create the message textarea, pre-filled with `content`.
pub fn create_textarea<'a>(content: &str) -> TextArea<'a> {
    let mut textarea = TextArea::default();

    if !content.is_empty() {
        let lines: Vec<&str> = content.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            textarea.insert_str(line);
            if i < lines.len() - 1 {
                textarea.insert_newline();
            }
        }
        if content.ends_with('\n') {
            textarea.insert_newline();
        }
    }

    textarea.move_cursor(tui_textarea::CursorMove::Bottom);
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea.set_max_histories(100);
    style_textarea(&mut textarea, false);

    textarea
}

/// Border and cursor styling for the focused / unfocused state.
pub fn style_textarea(textarea: &mut TextArea<'_>, focused: bool) {
    let color = if focused { Color::Yellow } else { Color::Gray };
    textarea.set_block(
        Block::default()
            .title(" Message ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    let cursor = if focused {
        Style::default().bg(Color::White).fg(Color::Black)
    } else {
        Style::default()
    };
    textarea.set_cursor_style(cursor);
    textarea.set_cursor_line_style(Style::default());
}

pub fn textarea_content(textarea: &TextArea) -> String {
    textarea.lines().join("\n")
}
