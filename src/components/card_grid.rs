use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    format_name, spinner, Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_PANEL, TEXT_DIM,
    TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, CreatureRecord};

pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 7;

/// Cards per row for a grid `width` cells wide.
pub fn grid_columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

pub struct CardGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The visible records laid out as cards, row by row.
#[derive(Default)]
pub struct CardGrid;

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        let row = grid_columns(props.state.terminal_size.0) as i16;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-row)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(row)),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::CardSelect(0)),
            KeyCode::End | KeyCode::Char('G') => Some(Action::CardSelect(usize::MAX)),
            KeyCode::Char('/') => Some(Action::SearchStart),
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CardGridProps<'_>) {
        let state = props.state;

        if let Some(error) = state.index.error() {
            render_notice(
                frame,
                area,
                vec![
                    Line::styled(
                        "Could not load the Pokedex index.",
                        Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(error.to_string(), Style::default().fg(TEXT_DIM)),
                ],
            );
            return;
        }

        if !state.index.is_loaded() {
            render_notice(
                frame,
                area,
                vec![Line::styled(
                    format!("{} Loading index...", spinner(state.tick)),
                    Style::default().fg(ACCENT_GOLD),
                )],
            );
            return;
        }

        if state.visible.is_empty() {
            let lines = if state.hydrating {
                vec![Line::styled(
                    format!("{} Hydrating...", spinner(state.tick)),
                    Style::default().fg(ACCENT_GOLD),
                )]
            } else if state.search.active {
                vec![
                    Line::styled("No loaded card matches.", Style::default().fg(TEXT_MAIN)),
                    Line::styled(
                        "Press Enter to search the full index.",
                        Style::default().fg(TEXT_DIM),
                    ),
                ]
            } else {
                vec![
                    Line::styled(
                        "No results",
                        Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled("Esc shows the full window.", Style::default().fg(TEXT_DIM)),
                ]
            };
            render_notice(frame, area, lines);
            return;
        }

        let columns = grid_columns(area.width);
        let rows_fit = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = state.selected_index / columns;
        let first_row = selected_row.saturating_sub(rows_fit - 1);

        for (position, record) in state
            .visible_records()
            .enumerate()
            .skip(first_row * columns)
            .take(rows_fit * columns)
        {
            let row = (position / columns - first_row) as u16;
            let col = (position % columns) as u16;
            let card_area = Rect {
                x: area.x + col * CARD_WIDTH,
                y: area.y + row * CARD_HEIGHT,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            }
            .intersection(area);
            if card_area.is_empty() {
                continue;
            }
            render_card(
                frame,
                card_area,
                record,
                position == state.selected_index,
            );
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, record: &CreatureRecord, selected: bool) {
    let border = if selected {
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let title = Line::from(vec![
        Span::styled(format!(" #{:03} ", record.id), Style::default().fg(ACCENT_GOLD)),
        Span::styled(
            format!("{} ", format_name(&record.name)),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);

    let paragraph = Paragraph::new(card_text(record))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn card_text(record: &CreatureRecord) -> Text<'static> {
    let types = record.type_names().join(" / ");
    let weak = if record.weaknesses.is_empty() {
        "-".to_string()
    } else {
        record
            .weaknesses
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let art = record
        .image_url
        .as_deref()
        .and_then(|url| url.rsplit('/').next())
        .unwrap_or("none")
        .to_string();

    Text::from(vec![
        Line::from(vec![
            Span::styled("Type ", Style::default().fg(TEXT_DIM)),
            Span::styled(types, Style::default().fg(ACCENT_TEAL)),
        ]),
        Line::from(vec![
            Span::styled("Art  ", Style::default().fg(TEXT_DIM)),
            Span::styled(art, Style::default().fg(TEXT_DIM)),
        ]),
        Line::from(vec![
            Span::styled("Weak ", Style::default().fg(TEXT_DIM)),
            Span::styled(weak, Style::default().fg(ACCENT_RED)),
        ]),
    ])
}

fn render_notice(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let notice_area = Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: area.height.saturating_sub(top),
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, notice_area);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::state::TypeSlot;
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    fn pikachu() -> CreatureRecord {
        CreatureRecord {
            name: "pikachu".into(),
            id: 25,
            image_url: Some("https://img/artwork/25.png".into()),
            types: vec![TypeSlot {
                slot: 1,
                name: "electric".into(),
                url: "https://pokeapi.co/api/v2/type/13/".into(),
            }],
            weaknesses: BTreeSet::from(["ground".to_string()]),
        }
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(10), 1);
        assert_eq!(grid_columns(CARD_WIDTH * 3 + 5), 3);
    }

    #[test]
    fn test_vertical_moves_use_row_width() {
        let mut grid = CardGrid;
        let state = AppState {
            terminal_size: (CARD_WIDTH * 4, 40),
            ..Default::default()
        };
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(key("j")),
                CardGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SelectionMove(4));
    }

    #[test]
    fn test_slash_starts_search() {
        let mut grid = CardGrid;
        let state = AppState::default();
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(key("/")),
                CardGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchStart);
    }

    #[test]
    fn test_card_shows_types_and_weaknesses() {
        let mut render = RenderHarness::new(60, 10);
        let mut grid = CardGrid;
        let mut state = AppState {
            index: DataResource::Loaded(Vec::new()),
            hydrated: vec![pikachu()],
            ..Default::default()
        };
        state.show_all_hydrated();

        let output = render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CardGridProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("#025"));
        assert!(output.contains("Pikachu"));
        assert!(output.contains("electric"));
        assert!(output.contains("ground"));
        assert!(output.contains("25.png"));
    }
}
