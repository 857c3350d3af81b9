use crate::app::{App, InputMode, Tab};
use crate::dates;
use crate::filter::ToDoCategory;
use crate::models::{AvatarPart, DifficultyLevel, Tag};
use chrono::{DateTime, Local};
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn difficulty_color(difficulty: DifficultyLevel) -> Color {
    match difficulty {
        DifficultyLevel::Easy => Color::Green,
        DifficultyLevel::Medium => Color::Yellow,
        DifficultyLevel::Hard => Color::Red,
    }
}

fn get_legend(input_mode: &InputMode, tab: &Tab) -> Text<'static> {
    let keys: Vec<(&str, &str)> = match (input_mode, tab) {
        (InputMode::Normal, Tab::Todos) => vec![
            ("q", "Quit"),
            ("Tab", "Shop"),
            ("j/k", "Move"),
            ("Space", "Toggle Done"),
            ("1-9", "Toggle Checklist"),
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("f", "Filter"),
            ("s", "Sort"),
        ],
        (InputMode::Normal, Tab::Shop) => vec![
            ("q", "Quit"),
            ("Tab", "To Do's"),
            ("h/j/k/l", "Move"),
            ("b", "Part"),
            ("c", "Category"),
            ("Enter", "Buy"),
        ],
        (InputMode::Editing, _) => vec![("Enter", "Submit"), ("Esc", "Cancel")],
        (InputMode::Filter, _) => vec![
            ("j/k", "Move"),
            ("Space", "Select"),
            ("r", "Reset"),
            ("Esc", "Close"),
        ],
        (InputMode::Confirm, _) => vec![("y", "Buy"), ("n", "Cancel")],
    };

    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Red),
        ));
        spans.push(Span::raw(format!(": {} ", action)));
    }
    Text::from(Line::from(spans))
}

fn part_label(part: &AvatarPart) -> String {
    format!(
        "{} {} {}",
        part.part.label(),
        part.category.label(),
        part.index
    )
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, now: DateTime<Local>) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {}!", dates::greeting(now), app.user.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(now.format("%b/%d/%Y").to_string())),
    ]);
    f.render_widget(header, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect, now: DateTime<Local>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(area);

    let ratio = app.completion_ratio(now).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Today's completion"),
        )
        .gauge_style(Style::default().fg(Color::Yellow))
        .label(format!("{:.1}%", ratio * 100.0))
        .ratio(ratio);
    f.render_widget(gauge, chunks[0]);

    let coins = Paragraph::new(Line::from(vec![
        Span::styled("coin ", Style::default().fg(Color::Yellow)),
        Span::styled(
            app.user.award.coin.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Balance"))
    .alignment(Alignment::Center);
    f.render_widget(coins, chunks[1]);
}

fn draw_todos_tab(f: &mut Frame, app: &mut App, area: Rect, now: DateTime<Local>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    let visible = app.visible_indices(now);
    let list_title = format!("To Do's ({})", app.selected_category.label());

    // Left panel: filtered todo list
    let todos_widget = if !visible.is_empty() {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|&idx| {
                let todo = &app.user.todo_list[idx];
                let check = if todo.is_complete { "[x] " } else { "[ ] " };
                let mut spans = vec![
                    Span::styled(check, Style::default().fg(difficulty_color(todo.difficulty))),
                    if todo.is_complete {
                        Span::styled(
                            todo.title.clone(),
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT),
                        )
                    } else {
                        Span::raw(todo.title.clone())
                    },
                    Span::styled(
                        format!("  {}", todo.due_date_string()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if !todo.checklist.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}/{}", todo.completed_checklist(), todo.checklist.len()),
                        Style::default().fg(Color::Cyan),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ")
    } else {
        List::new(vec![ListItem::new("No todos match the filter")])
            .block(Block::default().borders(Borders::ALL).title(list_title))
    };

    f.render_stateful_widget(todos_widget, chunks[0], &mut app.state);

    // Right panel: selected todo details
    let detail_block = Block::default().borders(Borders::ALL).title("Details");

    if let Some(idx) = app.selected_todo(now) {
        let todo = &app.user.todo_list[idx];
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Difficulty: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                todo.difficulty.label().to_string(),
                Style::default().fg(difficulty_color(todo.difficulty)),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Due Date: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(todo.due_date_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Reminder: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(todo.reminder.format("%b/%d/%Y %H:%M").to_string()),
        ]));

        lines.push(Line::from(Span::styled(
            "Tags: ",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if todo.tags.is_empty() {
            lines.push(Line::from(Span::raw("No tags".to_string())));
        } else {
            let mut tag_spans: Vec<Span<'static>> = Vec::new();
            for (i, tag) in todo.tags.iter().enumerate() {
                if i > 0 {
                    tag_spans.push(Span::raw(" ".to_string()));
                }
                tag_spans.push(Span::styled(
                    format!(" {} ", tag.label()),
                    Style::default().bg(Color::Yellow).fg(Color::Black),
                ));
            }
            lines.push(Line::from(tag_spans));
        }

        lines.push(Line::from(Span::styled(
            "Notes: ",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if todo.notes.is_empty() {
            lines.push(Line::from(Span::raw("No notes".to_string())));
        } else {
            lines.push(Line::from(Span::raw(todo.notes.clone())));
        }

        if !todo.checklist.is_empty() {
            lines.push(Line::from(Span::styled(
                "Checklist: ",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for (i, item) in todo.checklist.iter().enumerate() {
                let check = if item.is_complete { "[x]" } else { "[ ]" };
                lines.push(Line::from(Span::raw(format!(
                    "{}. {} {}",
                    i + 1,
                    check,
                    item.title
                ))));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(detail_block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, chunks[1]);
    } else {
        let paragraph = Paragraph::new("Select a todo to view details")
            .block(detail_block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, chunks[1]);
    }
}

fn draw_shop_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    // Current avatar, one slot per line
    let avatar_lines: Vec<Line> = app
        .user
        .avatar
        .parts
        .iter()
        .map(|part| Line::from(Span::raw(part_label(part))))
        .collect();
    let avatar_widget = Paragraph::new(avatar_lines)
        .block(Block::default().borders(Borders::ALL).title("Your avatar"));
    f.render_widget(avatar_widget, chunks[0]);

    let selectors = Paragraph::new(Line::from(vec![
        Span::styled("Part: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.shop_part.label()),
        Span::raw("   "),
        Span::styled("Category: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.shop_category.label()),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Choose"));
    f.render_widget(selectors, chunks[1]);

    // 3x4 grid of part variants with prices, greyed when unaffordable
    let mut grid_lines: Vec<Line> = Vec::new();
    for row in 0..3u8 {
        let mut spans: Vec<Span> = Vec::new();
        for column in 1..=4u8 {
            let index = row * 4 + column;
            let part = AvatarPart::new(app.shop_part, app.shop_category, index);
            let price = app.rules.price_of(&part);
            let affordable = price.coin <= app.user.award.coin;
            let selected = index == app.shop_index;

            let style = if selected {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if affordable {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker = if selected { ">" } else { " " };
            spans.push(Span::styled(
                format!("{}#{:<2} {:>5} coins   ", marker, index, price.coin),
                style,
            ));
        }
        grid_lines.push(Line::from(spans));
        grid_lines.push(Line::from(""));
    }
    let grid = Paragraph::new(grid_lines)
        .block(Block::default().borders(Borders::ALL).title("Parts"));
    f.render_widget(grid, chunks[2]);
}

fn draw_filter_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_absolute(34, 12, area);
    let mut lines: Vec<Line> = Vec::new();

    for (row, category) in ToDoCategory::all().iter().enumerate() {
        let marker = if *category == app.selected_category {
            "(x)"
        } else {
            "( )"
        };
        let style = if row == app.filter_cursor {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", marker, category.label()),
            style,
        )));
    }
    lines.push(Line::from(""));
    for (row, tag) in Tag::all().iter().enumerate() {
        let marker = if app.selected_tags.contains(tag) {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if row + 4 == app.filter_cursor {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", marker, tag.label()),
            style,
        )));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title("Filters")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_input_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_width_percentage = 60;
    let popup_width = (area.width * popup_width_percentage / 100).saturating_sub(2);

    let lines_required = calculate_wrapped_lines(&app.new_todo_input, popup_width.max(1));
    let required_height = std::cmp::max(lines_required as u16, 1);
    let popup_height = std::cmp::min(required_height + 2, area.height.saturating_sub(2));

    let popup_area = centered_rect_absolute(popup_width + 2, popup_height, area);

    let title = if app.editing_index.is_some() {
        "Edit To Do (!difficulty, #tags, @due, -- notes)"
    } else {
        "New To Do (!difficulty, #tags, @due, -- notes)"
    };
    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let input = Paragraph::new(app.new_todo_input.as_str())
        .style(Style::default().fg(Color::White))
        .block(popup_block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App, area: Rect) {
    let Some(part) = app.pending_purchase else {
        return;
    };
    let price = app.rules.price_of(&part);
    let popup_area = centered_rect_absolute(44, 5, area);
    let popup = Paragraph::new(vec![
        Line::from(Span::raw(format!(
            "Sure to get {} for {} coins?",
            part_label(&part),
            price.coin
        ))),
        Line::from(Span::styled(
            "y: Yes   n: No",
            Style::default().fg(Color::Green),
        )),
    ])
    .block(
        Block::default()
            .title("New avatar")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Yellow)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw(f: &mut Frame, app: &mut App, now: DateTime<Local>) {
    let size = f.area();

    // Split the main layout into header, status, body and footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(size);

    draw_header(f, app, chunks[0], now);
    draw_status(f, app, chunks[1], now);

    let body_chunk = chunks[2];
    let footer_chunk = chunks[3];

    match app.tab {
        Tab::Todos => draw_todos_tab(f, app, body_chunk, now),
        Tab::Shop => draw_shop_tab(f, app, body_chunk),
    }

    match app.input_mode {
        InputMode::Editing => draw_input_popup(f, app, body_chunk),
        InputMode::Filter => draw_filter_popup(f, app, body_chunk),
        InputMode::Confirm => draw_confirm_popup(f, app, body_chunk),
        InputMode::Normal => {}
    }

    // Render the legend in the footer
    let legend = Paragraph::new(get_legend(&app.input_mode, &app.tab))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(legend, footer_chunk);
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        let now = Local::now();
        terminal.draw(|f| draw(f, &mut app, now))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_input(key, now) {
                    return Ok(());
                }
            }
        }
    }
}

fn calculate_wrapped_lines(text: &str, max_width: u16) -> usize {
    let mut line_count = 0;
    for line in text.lines() {
        let line_width = line.chars().count() as u16;
        line_count += ((line_width + max_width - 1) / max_width) as usize;
    }
    line_count
}
