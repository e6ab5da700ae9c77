use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use roster_core::{Country, FormController, FormMode, Gender, Hobby, ImageSlot};

use crate::app::{App, FormField, View, VimMode};

const TABLE_HEAD: [&str; 7] = [
    "UserName", "Email", "Gender", "Hobbies", "Country", "Message", "Image",
];

pub fn draw(f: &mut Frame, app: &App) {
    match app.view() {
        View::List => draw_list(f, app),
        View::Form => draw_form(f, app),
        View::NotFound => draw_not_found(f, app),
    }

    if let Some(ref input) = app.goto_prompt {
        draw_goto_popup(f, input);
    }

    if let Some(ref error) = app.error_message {
        draw_error_popup(f, error);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "ROSTER",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(app.router.current().path(), Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled(
            format!("{} user(s)", app.store.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_list(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    if app.store.is_empty() {
        let empty = Paragraph::new("No users yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Users "));
        f.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(TABLE_HEAD.iter().map(|h| Cell::from(*h)))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = app
            .store
            .list()
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let style = if i == app.selected_row {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(user.username.clone()),
                    Cell::from(user.email.clone()),
                    Cell::from(user.gender.map(|g| g.label()).unwrap_or("-")),
                    Cell::from(user.hobbies_label()),
                    Cell::from(user.country.map(|c| c.label()).unwrap_or("-")),
                    Cell::from(user.message.lines().next().unwrap_or("").to_string()),
                    Cell::from(user.image.summary()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Percentage(12),
            Constraint::Percentage(20),
            Constraint::Percentage(8),
            Constraint::Percentage(18),
            Constraint::Percentage(8),
            Constraint::Percentage(16),
            Constraint::Percentage(18),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(" Users ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(table, chunks[1]);
    }

    draw_status_bar(
        f,
        chunks[2],
        app,
        "a: add | e/Enter: edit | d: delete | g: go to | j/k: select | q: quit",
    );
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, hints: &str) {
    let (mode, mode_color) = match app.vim_mode {
        VimMode::Normal => ("NORMAL", Color::Blue),
        VimMode::Insert => ("INSERT", Color::Green),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(mode_color).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(hints.to_string(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(ref status) = app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Field block with the field's error, if any, shown under it.
fn field_block(title: &str, focused: bool, error: Option<&str>) -> Block<'static> {
    let mut block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(if error.is_some() && !focused {
            Style::default().fg(Color::Red)
        } else {
            focus_style(focused)
        });
    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red),
        )));
    }
    block
}

fn draw_form(f: &mut Frame, app: &App) {
    let Some(ref form) = app.form else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    let (title, subtitle) = match form.mode() {
        FormMode::Create => (" Add Your Detail ", "Nice to meet you! Enter your details here."),
        FormMode::Edit(_) => (" Update Your Detail ", "Change whatever you need and submit."),
    };
    let form_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = form_block.inner(chunks[1]);
    f.render_widget(form_block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Subtitle
            Constraint::Length(3), // Username
            Constraint::Length(3), // Email
            Constraint::Length(3), // Gender
            Constraint::Length(3), // Hobbies
            Constraint::Length(3), // Country
            Constraint::Length(5), // Message
            Constraint::Length(4), // Image
            Constraint::Length(1), // Submit
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(subtitle).style(Style::default().fg(Color::DarkGray)),
        rows[0],
    );

    let errors = form.visible_errors();
    let draft = form.draft();
    let focused = app.form_field;

    let username = Paragraph::new(draft.username.as_str()).block(field_block(
        "Username",
        focused == FormField::Username,
        errors.username.as_deref(),
    ));
    f.render_widget(username, rows[1]);

    let email = Paragraph::new(draft.email.as_str()).block(field_block(
        "Email",
        focused == FormField::Email,
        errors.email.as_deref(),
    ));
    f.render_widget(email, rows[2]);

    let gender_spans: Vec<Span> = Gender::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, g)| {
            let mark = if draft.gender == Some(*g) { "(•)" } else { "( )" };
            let mut style = Style::default();
            if focused == FormField::Gender && i == app.gender_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [
                Span::styled(format!("{} {}", mark, g.label()), style),
                Span::raw("   "),
            ]
        })
        .collect();
    let gender = Paragraph::new(Line::from(gender_spans)).block(field_block(
        "Select your gender",
        focused == FormField::Gender,
        None,
    ));
    f.render_widget(gender, rows[3]);

    let hobby_spans: Vec<Span> = Hobby::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, h)| {
            let mark = if draft.hobbies.contains(h) { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if focused == FormField::Hobbies && i == app.hobby_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [
                Span::styled(format!("{} {}", mark, h.label()), style),
                Span::raw("   "),
            ]
        })
        .collect();
    let hobbies = Paragraph::new(Line::from(hobby_spans)).block(field_block(
        "Select your hobbies",
        focused == FormField::Hobbies,
        errors.hobbies.as_deref(),
    ));
    f.render_widget(hobbies, rows[4]);

    let country_label = draft.country.map(|c| c.label()).unwrap_or("Select Country");
    let country = Paragraph::new(format!("< {} >", country_label)).block(field_block(
        &country_title(),
        focused == FormField::Country,
        None,
    ));
    f.render_widget(country, rows[5]);

    f.render_widget(&app.message_editor, rows[6]);

    draw_image_field(f, rows[7], app, form, errors.image.as_deref());

    let submit_style = if focused == FormField::Submit {
        Style::default().bg(Color::Cyan).fg(Color::Black)
    } else if form.can_submit() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(Span::styled(" [ Submit ] ", submit_style)).alignment(Alignment::Center),
        rows[8],
    );

    if app.vim_mode == VimMode::Insert {
        let cursor = match focused {
            FormField::Username => Some((rows[1], draft.username.chars().count())),
            FormField::Email => Some((rows[2], draft.email.chars().count())),
            FormField::Image => Some((rows[7], app.image_path.chars().count())),
            _ => None,
        };
        if let Some((area, len)) = cursor {
            f.set_cursor_position((area.x + 1 + len as u16, area.y + 1));
        }
    }

    let hints = match app.vim_mode {
        VimMode::Normal => {
            "j/k: field | i: edit | space/h/l: choose | Enter: load image | s: submit | R: reset | Esc: back"
        }
        VimMode::Insert => "Type to enter | Enter: confirm | Esc: normal",
    };
    draw_status_bar(f, chunks[2], app, hints);
}

fn country_title() -> String {
    let options: Vec<&str> = Country::ALL.iter().map(|c| c.label()).collect();
    format!("Country ({})", options.join("/"))
}

fn draw_image_field(
    f: &mut Frame,
    area: Rect,
    app: &App,
    form: &FormController,
    error: Option<&str>,
) {
    let status = match form.draft().image {
        ImageSlot::Empty => Line::from(Span::styled(
            "No image selected",
            Style::default().fg(Color::DarkGray),
        )),
        ImageSlot::Pending { ref file_name, .. } => Line::from(Span::styled(
            format!("Loading {}...", file_name),
            Style::default().fg(Color::Yellow),
        )),
        ImageSlot::Ready(ref image) => {
            let preview: String = image.data_url.chars().take(48).collect();
            Line::from(vec![
                Span::styled(image.summary(), Style::default().fg(Color::Green)),
                Span::raw("  "),
                Span::styled(
                    format!("{} {}...", image.mime_type, preview),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
    };

    let path_line = if app.image_path.is_empty() {
        Line::from(Span::styled(
            "Type a file path and press Enter",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.image_path.as_str())
    };

    let image = Paragraph::new(vec![path_line, status]).block(field_block(
        "Please Select an Image",
        app.form_field == FormField::Image,
        error,
    ));
    f.render_widget(image, area);
}

fn draw_not_found(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Message
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    let area = centered_rect(60, 40, chunks[1]);
    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            "Page not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Nothing lives at {}", app.router.current().path())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(message, area);

    draw_status_bar(f, chunks[2], app, "Esc: back | g: go to | q: quit");
}

fn draw_goto_popup(f: &mut Frame, input: &str) {
    let area = centered_rect(50, 20, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Go To ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Path input
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let path_block = Block::default()
        .title(" Path ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(input).block(path_block), chunks[0]);

    let hint = Paragraph::new("/, /addform, /updateform/<id> | Enter: go | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);

    f.set_cursor_position((
        chunks[0].x + 1 + input.chars().count() as u16,
        chunks[0].y + 1,
    ));
}

fn draw_error_popup(f: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
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
