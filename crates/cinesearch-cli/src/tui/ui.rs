//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::state::{BrowserState, FetchPhase};

/// Draws the movie browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    // The trending strip only takes a row when there is data for it.
    let trending_height = if state.trending.is_empty() { 0 } else { 3 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // search box
            Constraint::Length(trending_height), // trending strip
            Constraint::Min(5),                  // movie list
            Constraint::Length(3),               // footer
        ])
        .split(frame.area());

    draw_search_box(frame, chunks[0], state);
    if trending_height > 0 {
        draw_trending(frame, chunks[1], state);
    }
    draw_movies(frame, chunks[2], state);
    draw_footer(frame, chunks[3]);
}

/// Draws the search input box.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let input_style = if state.input.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let input_text = if state.input.is_empty() {
        String::from("Search through thousands of movies")
    } else {
        state.input.clone()
    };

    let search = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search "),
    );
    frame.render_widget(search, area);
}

/// Draws the trending strip: ranked terms with search counts.
fn draw_trending(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let spans: Vec<Span> = state
        .trending
        .iter()
        .enumerate()
        .flat_map(|(i, entry)| {
            vec![
                Span::styled(
                    format!("{}. ", i.saturating_add(1)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.query.clone(), Style::default().fg(Color::Magenta)),
                Span::styled(
                    format!(" ({})   ", entry.count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        })
        .collect();

    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Trending "),
    );
    frame.render_widget(strip, area);
}

/// Draws the main movie list area for the current phase.
fn draw_movies(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Movies ");

    match &state.phase {
        FetchPhase::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(loading, area);
        }
        FetchPhase::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        FetchPhase::Loaded => {
            if state.movies.is_empty() {
                let empty = Paragraph::new("No movies found.")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                frame.render_widget(empty, area);
                return;
            }

            let items: Vec<ListItem> = state
                .movies
                .iter()
                .enumerate()
                .map(|(i, movie)| {
                    let marker = if i == state.cursor { "\u{25b8} " } else { "  " };

                    let style = if i == state.cursor {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };

                    let year = movie
                        .release_year()
                        .map_or_else(String::new, |y| format!("  ({y})"));
                    let rating = if movie.vote_average > 0.0 {
                        format!("  \u{2605} {:.1}", movie.vote_average)
                    } else {
                        String::new()
                    };

                    ListItem::new(Line::from(vec![
                        Span::raw(String::from(marker)),
                        Span::styled(format!("{}{year}{rating}", movie.title), style),
                    ]))
                })
                .collect();

            let list = List::new(items).block(block);
            frame.render_widget(list, area);
        }
    }
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help_text =
        "Type to search  \u{2191}\u{2193}: move  Enter: search now  Esc: quit";
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
