//! Dao of Zero rendering.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::logic::format_number;
use super::state::GameState;
use super::view::{self, ItemView, ResourceSummary};
use super::{click_id, DaoGame, Tab};

pub fn render(game: &DaoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let (main_area, log_area) = if is_narrow_layout(area.width) {
        let v = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(8)])
            .split(area);
        (v[0], v[1])
    } else {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h[0], h[1])
    };

    let summary = view::resource_summary(&game.state);
    let header_lines = header_lines(&summary);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_lines.len() as u16 + 2),
            Constraint::Length(3), // cultivate button
            Constraint::Length(3), // tab bar
            Constraint::Min(4),    // list
        ])
        .split(main_area);

    render_header(game, header_lines, &summary, f, chunks[0]);
    render_cultivate(&summary, f, chunks[1], click_state);
    render_tabs(game, f, chunks[2], click_state);
    match game.tab {
        Tab::Settings => render_settings(game, f, chunks[3], click_state),
        _ => render_items(game, f, chunks[3], click_state),
    }
    render_log(&game.state, f, log_area);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::Gray))
}

fn value(text: String, color: Color) -> Span<'static> {
    Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn header_lines(summary: &ResourceSummary) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            label(" Dao Marks: "),
            value(summary.dao_marks.clone(), Color::Yellow),
            label(format!("  (+{}/s)", summary.marks_per_second).as_str()),
        ]),
        Line::from(vec![
            label(" Qi: "),
            value(format!("{} / {}", summary.qi, summary.max_qi), Color::Cyan),
            label(format!("  ({}/click)", summary.qi_per_click).as_str()),
        ]),
    ];

    let mut extra: Vec<Span<'static>> = Vec::new();
    if let Some(insight) = &summary.insight {
        extra.push(label(" Insight: "));
        extra.push(value(insight.clone(), Color::Magenta));
    }
    if let Some(prestige) = &summary.prestige {
        extra.push(label(" Prestige: "));
        extra.push(value(prestige.clone(), Color::LightRed));
    }
    if !extra.is_empty() {
        lines.push(Line::from(extra));
    }

    if let Some(tribute) = &summary.tribute_per_second {
        lines.push(Line::from(vec![
            label(" Qi/s: "),
            value(summary.qi_per_second.clone(), Color::Cyan),
            label("  Tribute: "),
            value(format!("{}/s", tribute), Color::LightRed),
        ]));
    }
    lines
}

fn render_header(
    game: &DaoGame,
    lines: Vec<Line<'static>>,
    summary: &ResourceSummary,
    f: &mut Frame,
    area: Rect,
) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" 道 The Dao of Zero ─ {} ", summary.realm));
    if let Some((text, _)) = &game.banner {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" ✦ {} ", text),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cultivate(
    summary: &ResourceSummary,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let color = if summary.button_glyph == "道" {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let line = Line::from(vec![
        Span::styled(" [C] ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            summary.button_glyph,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", summary.button_label),
            Style::default().fg(Color::White),
        ),
    ]);
    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(widget, area);

    click_state.borrow_mut().add_click_target(area, CULTIVATE);
}

fn render_tabs(game: &DaoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut bar = TabBar::new(" │ ").tab("Upgrades (u)", game.tab == Tab::Upgrades, TAB_UPGRADES);
    if game.techniques_visible() {
        bar = bar.tab(
            "Techniques (t)",
            game.tab == Tab::Techniques,
            TAB_TECHNIQUES,
        );
    }
    bar = bar
        .tab("Actions (a)", game.tab == Tab::Actions, TAB_ACTIONS)
        .tab("Settings (o)", game.tab == Tab::Settings, TAB_SETTINGS)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    let mut cs = click_state.borrow_mut();
    bar.render(f, area, &mut cs);
}

/// Right-hand status of an item row: cost, cooldown or MAX.
fn status_span(v: &ItemView) -> Span<'static> {
    if v.is_maxed {
        return Span::styled("  ✓ MAX", Style::default().fg(Color::Green));
    }
    if let Some(cd) = v.cooldown_text() {
        return Span::styled(format!("  ⏳ {}", cd), Style::default().fg(Color::DarkGray));
    }
    let color = if v.is_purchasable {
        Color::Yellow
    } else {
        Color::Red
    };
    Span::styled(format!("  {}", v.cost_text()), Style::default().fg(color))
}

fn render_items(game: &DaoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let title = match game.tab {
        Tab::Upgrades => " Upgrades ",
        Tab::Techniques => " Techniques ",
        _ => " Actions ",
    };

    // Drop descriptions, then effects, when the list does not fit.
    let rows = area.height.saturating_sub(2) as usize;
    let per_item = match game.views.len() {
        0 => 1,
        n if n * 3 <= rows => 3,
        n if n * 2 <= rows => 2,
        _ => 1,
    };

    let mut cl = ClickableList::new();
    if game.views.is_empty() {
        cl.push(Line::from(Span::styled(
            " Nothing to pursue yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, v) in game.views.iter().enumerate() {
        let id = click_id(v.item);
        let key = if i < 9 {
            format!(" {}. ", i + 1)
        } else {
            "    ".to_string()
        };
        let name_style = if v.is_purchasable {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut head = vec![
            Span::styled(key, Style::default().fg(Color::Yellow)),
            Span::styled(v.name, name_style),
        ];
        let level = v.level_text();
        if !level.is_empty() {
            head.push(Span::styled(format!(" {}", level), Style::default().fg(Color::Cyan)));
        }
        head.push(status_span(v));
        cl.push_clickable(Line::from(head), id);

        if per_item >= 3 {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("    {}", v.description),
                    Style::default().fg(Color::DarkGray),
                )),
                id,
            );
        }
        if per_item >= 2 {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("    {}", v.effect_text),
                    Style::default().fg(Color::Cyan),
                )),
                id,
            );
        }
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(title),
    );
    f.render_widget(widget, area);
}

fn render_settings(
    game: &DaoGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let on_off = |on: bool| if on { "ON" } else { "OFF" };
    let item = Style::default().fg(Color::White);
    let danger = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    let mut cl = ClickableList::new();
    cl.push_clickable(Line::from(Span::styled(" [S] Save now", item)), SAVE_NOW);
    cl.push_clickable(
        Line::from(Span::styled(
            format!(" [G] Autosave: {}", on_off(state.settings.autosave_enabled)),
            item,
        )),
        TOGGLE_AUTOSAVE,
    );
    cl.push_clickable(Line::from(Span::styled(" [E] Export save", item)), EXPORT_SAVE);
    cl.push_clickable(Line::from(Span::styled(" [I] Import save", item)), IMPORT_SAVE);
    let reset_text = if game.reset_armed {
        " [R] Press again to erase everything"
    } else {
        " [R] Reset progress"
    };
    cl.push_clickable(Line::from(Span::styled(reset_text, danger)), RESET_GAME);

    let dim = Style::default().fg(Color::DarkGray);
    let since_save = game.now_ms.saturating_sub(state.last_save_ms) / 1000;
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!(" Breaths taken: {}", state.total_clicks),
        dim,
    )));
    cl.push(Line::from(Span::styled(
        format!(
            " Dao Marks produced: {}",
            format_number(state.total_marks_produced, 0)
        ),
        dim,
    )));
    cl.push(Line::from(Span::styled(
        format!(" Phase {} · {}", state.phase, state.realm),
        dim,
    )));
    cl.push(Line::from(Span::styled(
        format!(" Last saved {}s ago", since_save),
        dim,
    )));

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Settings "),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .log
        .iter()
        .take(visible)
        .enumerate()
        .map(|(i, entry)| {
            let text_style = if entry.is_important {
                Style::default().fg(Color::Yellow)
            } else if i < 3 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(
                    format!("{}s ", entry.elapsed_secs),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.text.as_str(), text_style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Journal "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
