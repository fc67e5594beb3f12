use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use comiccache_core::Comic;

use crate::app::{App, AppState, Screen};
use crate::utils::truncate_string;

use super::styles;

/// Width reserved for comic titles in the favorites list
const FAVORITE_TITLE_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(6),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.screen {
        Screen::Comic => render_comic_screen(frame, app, chunks[1]),
        Screen::Favorites => render_favorites_screen(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::Searching => render_search_overlay(frame, app),
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Comic => match app.comic.comic {
            Some(ref comic) => format!("  xkcd #{}", comic.num),
            None => "  xkcd".to_string(),
        },
        Screen::Favorites => format!("  Favorites ({})", app.favorites.favorites().len()),
    };
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

/// Screens lose focus while an overlay is open.
fn content_focused(state: AppState) -> bool {
    matches!(state, AppState::Normal | AppState::Quitting)
}

fn render_comic_screen(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(content_focused(app.state)));

    // Loading wins over errors, errors win over the comic.
    let state = &app.comic;
    if state.is_loading {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Loading...",
            styles::highlight_style(),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, centered_vertically(area, 3));
        return;
    }

    if let Some(ref message) = state.error {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_error(frame, message, inner);
        return;
    }

    match state.comic {
        Some(ref comic) => {
            let paragraph = Paragraph::new(comic_lines(comic))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(paragraph, area);
        }
        None => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Nothing loaded yet. Press [L] for the latest comic.",
                styles::muted_style(),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, centered_vertically(area, 3));
        }
    }
}

fn comic_lines(comic: &Comic) -> Vec<Line<'static>> {
    let favorite = if comic.is_favorite {
        "\u{2605} Favorite"
    } else {
        "\u{2606} Not a favorite"
    };

    vec![
        Line::from(Span::styled(comic.title.clone(), styles::comic_title_style())),
        Line::from(Span::styled(comic.display_date(), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(favorite, styles::favorite_style(comic.is_favorite)),
            Span::styled("  [f] toggle", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image: ", styles::highlight_style()),
            Span::raw(comic.img.clone()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Alt Text:", styles::highlight_style())),
        Line::from(Span::styled(comic.alt.clone(), styles::list_item_style())),
    ]
}

/// Error text centered above a retry hint that always keeps the bottom row.
fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let text = format!("Error: {}", message);
    let height = wrapped_height(&text, rows[0].width);
    let error = Paragraph::new(Line::from(Span::styled(text, styles::error_style())))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(error, centered_vertically(rows[0], height));

    let retry = Paragraph::new(Line::from(vec![
        Span::styled("[R]", styles::help_key_style()),
        Span::styled(" Retry", styles::muted_style()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(retry, rows[1]);
}

/// Rows `text` needs when wrapped to `width` columns.
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows = text.chars().count().div_ceil(width).max(1);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_favorites_screen(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Favorites ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(content_focused(app.state)));

    let favorites = app.favorites.favorites();
    if favorites.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No favorites yet!",
            styles::muted_style(),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = favorites
        .iter()
        .enumerate()
        .map(|(i, comic)| {
            let line = Line::from(vec![
                Span::styled(format!("#{:<6}", comic.num), styles::highlight_style()),
                Span::raw(format!(
                    "{:<width$}",
                    truncate_string(&comic.title, FAVORITE_TITLE_WIDTH),
                    width = FAVORITE_TITLE_WIDTH
                )),
                Span::styled(format!("  {}", comic.display_date()), styles::muted_style()),
            ]);

            let style = if i == app.favorites.selected() {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.favorites.selected()));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.screen {
        Screen::Comic => "[h]prev [l]next [r]andom [L]atest [/]search [v]favorites [q]uit",
        Screen::Favorites => "[j/k] move [Enter] open [b]ack [q]uit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => String::new(),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::highlight_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_search_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Comic number: ", styles::help_desc_style()),
            Span::styled(format!("{}_", app.search_input), styles::search_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Enter]", styles::help_key_style()),
            Span::styled(" Search  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" Cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Search Comic ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 18, frame.area());
    frame.render_widget(Clear, area);

    let keys = [
        ("h / \u{2190}", "Previous comic"),
        ("l / \u{2192}", "Next comic"),
        ("r", "Random comic"),
        ("L", "Latest comic"),
        ("f", "Toggle favorite"),
        ("/", "Search by number"),
        ("R", "Retry after an error"),
        ("v", "Favorites"),
        ("j / k", "Move in favorites"),
        ("Enter", "Open favorite"),
        ("b / Esc", "Back to comic"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn centered_vertically(r: Rect, height: u16) -> Rect {
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(r.x, y, r.width, height.min(r.height))
}
