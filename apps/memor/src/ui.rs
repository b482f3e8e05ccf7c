//! UI rendering for memor.

use crate::app::{Alert, App, HomeItem, View};
use crate::models::{Outcome, Tally};
use crate::motion::{StackLayer, Viewport, PREVIEW_CARDS};
use crate::session::Session;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Widget, Wrap},
    Frame,
};
use tui_theme::{faded, Color, ColorPalette};

const CARD_WIDTH_RATIO: f32 = 0.9;
const CARD_HEIGHT_RATIO: f32 = 0.75;
const DIAL_WIDTH: f32 = 14.0;

pub fn draw(f: &mut Frame, app: &mut App) {
    let background = Block::default().style(Style::default().bg(app.palette.background.to_ratatui()));
    f.render_widget(background, f.area());

    match app.view {
        View::Home => draw_home(f, app),
        View::DeckPicker => draw_picker(f, app),
        View::Practice => draw_practice(f, app),
    }

    if app.show_help {
        draw_help(f, &app.palette);
    }

    if let Some(alert) = &app.alert {
        draw_alert(f, alert, &app.palette);
    }
}

fn draw_home(f: &mut Frame, app: &App) {
    let palette = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let selected = |item: HomeItem| app.home_item == item;
    let item_style = |item: HomeItem, enabled: bool| {
        let color = if enabled { palette.text } else { palette.disabled_text };
        let style = Style::default().fg(color.to_ratatui());
        if selected(item) {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        }
    };
    let marker = |item: HomeItem| if selected(item) { "> " } else { "  " };

    let mut lines = vec![
        Line::from(Span::styled(
            "📚 Flashcards",
            Style::default().fg(palette.brand.to_ratatui()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Learn on the go—swipe right if you got it, left if you need more practice.",
            Style::default().fg(palette.secondary_text.to_ratatui()),
        )),
        Line::default(),
        Line::from(vec![
            Span::raw(marker(HomeItem::LoadDeck)),
            Span::styled(" Load a Deck ", item_style(HomeItem::LoadDeck, true)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::raw(marker(HomeItem::Practice)),
            Span::styled(" Practice ", item_style(HomeItem::Practice, app.has_deck)),
        ]),
        Line::default(),
    ];

    if !app.has_deck {
        lines.push(Line::from(Span::styled(
            "(Load a deck first to start practicing.)",
            Style::default().fg(palette.secondary_text.to_ratatui()),
        )));
    } else if let Some(name) = &app.deck_name {
        lines.push(Line::from(Span::styled(
            format!("Current deck: {name}"),
            Style::default().fg(palette.secondary_text.to_ratatui()),
        )));
    }

    let height = lines.len() as u16;
    let top = chunks[0].height.saturating_sub(height) / 2;
    let area = Rect {
        y: chunks[0].y + top,
        height: chunks[0].height.saturating_sub(top),
        ..chunks[0]
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);

    draw_footer(f, chunks[1], "j/k:Navigate  Enter:Select  R:Reset scores  ?:Help  q:Quit", palette);
}

fn draw_picker(f: &mut Frame, app: &App) {
    let palette = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let header = Paragraph::new("Select a Deck")
        .style(Style::default().fg(palette.text.to_ratatui()).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app
        .decks
        .iter()
        .enumerate()
        .map(|(i, deck)| {
            let source = match &deck.source {
                crate::import::DeckSource::Bundled(_) => "bundled".to_string(),
                crate::import::DeckSource::File(path) => path.display().to_string(),
            };
            let style = if i == app.selected_deck {
                Style::default().bg(palette.brand.to_ratatui()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text.to_ratatui())
            };
            ListItem::new(Line::from(vec![
                Span::styled(deck.name.clone(), style),
                Span::styled(format!("  ({source})"), Style::default().fg(palette.secondary_text.to_ratatui())),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Decks "));
    f.render_widget(list, chunks[1]);

    draw_footer(f, chunks[2], "j/k:Navigate  Enter:Load  Esc:Back  ?:Help", palette);
}

fn draw_practice(f: &mut Frame, app: &mut App) {
    let palette = app.palette;
    let cells = app.cell_size();
    let show_dial = app.config.display.show_dial;
    let deck_name = app.deck_name.clone();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let body = chunks[1];

    draw_footer(
        f,
        chunks[2],
        "Drag/arrows:Rate  Click/Space:Flip  1-4:Again..Easy  q:Home  ?:Help",
        &palette,
    );

    if let Some(err) = &app.load_error {
        let message = Paragraph::new(format!("Could not load deck: {err}"))
            .style(Style::default().fg(palette.again.to_ratatui()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(message, body);
        app.card_area = None;
        return;
    }

    let Some(session) = app.session.as_mut().filter(|s| !s.is_empty()) else {
        let loading = Paragraph::new("Loading deck…")
            .style(Style::default().fg(palette.secondary_text.to_ratatui()))
            .alignment(Alignment::Center);
        f.render_widget(loading, Rect { y: body.y + body.height / 2, height: 1, ..body });
        app.card_area = None;
        return;
    };

    let frame_area = f.area();
    session.set_viewport(Viewport::new(
        f32::from(frame_area.width) * cells.width,
        f32::from(frame_area.height) * cells.height,
    ));

    draw_progress(f, chunks[0], session, deck_name.as_deref(), &palette);

    let base = card_rect(body);
    let stack = CardStack { base, cells };

    // Deepest card first so the active card lands on top.
    let previews = session.upcoming(PREVIEW_CARDS).count();
    for depth in (1..=previews).rev() {
        if let Some(layer) = session.motion().layer(depth) {
            let sprite = Sprite::blank(&palette, layer.opacity);
            stack.draw(f.buffer_mut(), &sprite, layer, Placement::default());
        }
    }

    let motion = session.motion();
    if let (Some(card), Some(layer)) = (session.current_card(), motion.layer(0)) {
        let (text, face, text_opacity) = if motion.is_showing_answer() {
            (card.answer.as_str(), palette.card_back_background, motion.answer_opacity())
        } else {
            (card.question.as_str(), palette.card_background, motion.question_opacity())
        };
        let sprite = Sprite {
            text,
            face: face.over(palette.background, layer.opacity),
            border: palette.card_border.over(palette.background, layer.opacity),
            text_color: palette.text.over(face, text_opacity * layer.opacity),
        };
        let placement = Placement {
            offset: cells.to_cells(motion.offset()),
            squeeze: motion.flip_squeeze(),
            shear: -motion.rot_z().to_radians().sin() * cells.height / cells.width,
        };
        stack.draw(f.buffer_mut(), &sprite, layer, placement);
    }

    if show_dial {
        draw_dial(f, body, session, &palette);
    }

    app.card_area = Some(base);
}

fn draw_progress(f: &mut Frame, area: Rect, session: &Session, deck_name: Option<&str>, palette: &ColorPalette) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut title = format!("Card {} of {}", session.cursor() + 1, session.len());
    if session.is_last_card() {
        title.push_str(" (last card)");
    }
    if let Some(name) = deck_name {
        title.push_str(&format!("  |  {name}"));
    }

    let tally = session.tally_for_cursor();
    let mut counts = tally_spans(&tally, palette);
    counts.push(Span::styled(
        format!("  |  Rated: {}", session.summary().total()),
        Style::default().fg(palette.secondary_text.to_ratatui()),
    ));

    let lines = vec![
        Line::from(Span::styled(title, Style::default().fg(palette.text.to_ratatui()))),
        Line::from(counts),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    // Q/A indicator, fading out while the card is dragged away.
    let motion = session.motion();
    let (label, face_opacity) = if motion.is_showing_answer() {
        ("A", motion.answer_opacity())
    } else {
        ("Q", motion.question_opacity())
    };
    let opacity = face_opacity * motion.indicator_opacity();
    if opacity > 0.0 && inner.width > 0 {
        let badge = palette.indicator_background.over(palette.background, opacity);
        let indicator = Paragraph::new(Span::styled(
            format!(" {label} "),
            faded(palette.text, badge, opacity)
                .bg(badge.to_ratatui())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right);
        f.render_widget(indicator, Rect { height: 1, ..inner });
    }
}

fn tally_spans(tally: &Tally, palette: &ColorPalette) -> Vec<Span<'static>> {
    Outcome::ALL
        .iter()
        .flat_map(|&outcome| {
            [
                Span::styled(
                    format!("{} {}", outcome.label(), tally.count(outcome)),
                    Style::default().fg(outcome_color(outcome, palette).to_ratatui()),
                ),
                Span::raw("  "),
            ]
        })
        .collect()
}

fn outcome_color(outcome: Outcome, palette: &ColorPalette) -> Color {
    match outcome {
        Outcome::Again => palette.again,
        Outcome::Hard => palette.hard,
        Outcome::Good => palette.good,
        Outcome::Easy => palette.easy,
    }
}

fn draw_dial(f: &mut Frame, body: Rect, session: &Session, palette: &ColorPalette) {
    let dial = session.dial();
    let Some(outcome) = dial.outcome.filter(|_| dial.intensity > 0.0) else {
        return;
    };

    let width = ((DIAL_WIDTH * dial.scale).round() as u16).max(7).min(body.width);
    let area = Rect {
        x: body.x + (body.width - width) / 2,
        y: body.y,
        width,
        height: 3.min(body.height),
    };

    let color = outcome_color(outcome, palette);
    let surface = palette.dial_background.over(palette.background, dial.intensity);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(faded(color, palette.background, dial.intensity))
        .style(Style::default().bg(surface.to_ratatui()));
    let label = Paragraph::new(Span::styled(
        outcome.label(),
        faded(color, surface, dial.intensity).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(Clear, area);
    f.render_widget(label, area);
}

/// The active card's resting rectangle inside the practice body.
fn card_rect(body: Rect) -> Rect {
    let width = ((f32::from(body.width) * CARD_WIDTH_RATIO) as u16).max(4).min(body.width);
    let height = ((f32::from(body.height) * CARD_HEIGHT_RATIO) as u16).max(3).min(body.height);
    Rect {
        x: body.x + (body.width - width) / 2,
        y: body.y + (body.height - height) / 2,
        width,
        height,
    }
}

/// How the active card departs from its stack slot.
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Offset in cells
    offset: (f32, f32),
    /// Width factor while flipping
    squeeze: f32,
    /// Columns shifted per row below the card's center
    shear: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset: (0.0, 0.0),
            squeeze: 1.0,
            shear: 0.0,
        }
    }
}

struct Sprite<'a> {
    text: &'a str,
    face: Color,
    border: Color,
    text_color: Color,
}

impl Sprite<'static> {
    fn blank(palette: &ColorPalette, opacity: f32) -> Self {
        Self {
            text: "",
            face: palette.card_background.over(palette.background, opacity),
            border: palette.card_border.over(palette.background, opacity),
            text_color: palette.background,
        }
    }
}

struct CardStack {
    base: Rect,
    cells: crate::gesture::CellSize,
}

impl CardStack {
    /// Render a card scaled and lifted per `layer`, then copy it onto `dst` clipped to its area.
    ///
    /// Cards scale from their bottom edge so lower layers peek out beneath the active one.
    fn draw(&self, dst: &mut Buffer, sprite: &Sprite, layer: StackLayer, placement: Placement) {
        let base_w = f32::from(self.base.width);
        let base_h = f32::from(self.base.height);
        let height = (base_h * layer.scale).round().max(3.0) as u16;
        let full_width = (base_w * layer.scale).round().max(4.0);
        let width = (full_width * placement.squeeze).round().max(1.0) as u16;

        let lift_rows = (layer.lift / self.cells.height).ceil();
        let x = f32::from(self.base.x) + (base_w - f32::from(width)) / 2.0 + placement.offset.0;
        let y = f32::from(self.base.y) + (base_h - f32::from(height)) + lift_rows + placement.offset.1;

        let sprite_buf = render_sprite(width, height, sprite);
        blit(&sprite_buf, dst, x.round() as i32, y.round() as i32, placement.shear);
    }
}

fn render_sprite(width: u16, height: u16, sprite: &Sprite) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(sprite.border.to_ratatui()))
        .style(Style::default().bg(sprite.face.to_ratatui()));
    let inner = block.inner(area);
    block.render(area, &mut buf);

    if sprite.text.is_empty() || inner.width == 0 || inner.height == 0 {
        return buf;
    }

    let lines = wrapped_lines(sprite.text, inner.width);
    let top = inner.height.saturating_sub(lines) / 2;
    let text_area = Rect {
        y: inner.y + top,
        height: inner.height - top,
        ..inner
    };
    Paragraph::new(sprite.text)
        .style(Style::default().fg(sprite.text_color.to_ratatui()).bg(sprite.face.to_ratatui()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(text_area, &mut buf);
    buf
}

/// Rough line count of `text` wrapped at `width` columns.
fn wrapped_lines(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let lines: usize = text
        .lines()
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    u16::try_from(lines).unwrap_or(u16::MAX)
}

/// Copy `src` onto `dst` with its top-left at (`x`, `y`), shifting each row by `shear` columns
/// per row from the middle. Cells falling outside `dst` are dropped.
fn blit(src: &Buffer, dst: &mut Buffer, x: i32, y: i32, shear: f32) {
    let src_area = src.area;
    let dst_area = dst.area;
    let middle = (f32::from(src_area.height) - 1.0) / 2.0;

    for row in 0..src_area.height {
        let shift = ((f32::from(row) - middle) * shear).round() as i32;
        let dy = y + i32::from(row);
        if dy < i32::from(dst_area.top()) || dy >= i32::from(dst_area.bottom()) {
            continue;
        }
        for col in 0..src_area.width {
            let dx = x + i32::from(col) + shift;
            if dx < i32::from(dst_area.left()) || dx >= i32::from(dst_area.right()) {
                continue;
            }
            let (Some(cell), Some(target)) = (src.cell((col, row)), dst.cell_mut((dx as u16, dy as u16))) else {
                continue;
            };
            *target = cell.clone();
        }
    }
}

fn draw_footer(f: &mut Frame, area: Rect, text: &str, palette: &ColorPalette) {
    let footer = Paragraph::new(text)
        .style(Style::default().fg(palette.secondary_text.to_ratatui()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame, palette: &ColorPalette) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Memor Keybindings

Home:
  j/k, Up/Down    Choose an item
  Enter           Select
  l               Load a deck
  p               Practice
  R               Reset scores
  q               Quit

Practice:
  Drag the card   Rate it by direction
  Click, Space    Flip the card
  Left  / 1       Again
  Down  / 2       Hard
  Up    / 3       Good
  Right / 4       Easy
  q, Esc          Back to home

General:
  ?               Show this help

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .style(Style::default().fg(palette.text.to_ratatui()).bg(palette.background.to_ratatui()))
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_alert(f: &mut Frame, alert: &Alert, palette: &ColorPalette) {
    let area = centered_rect(60, 25, f.area());
    f.render_widget(Clear, area);

    let color = if alert.is_error { palette.again } else { palette.good };
    let text = vec![
        Line::from(Span::styled(alert.text.as_str(), Style::default().fg(color.to_ratatui()))),
        Line::default(),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(palette.secondary_text.to_ratatui()),
        )),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(palette.background.to_ratatui()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color.to_ratatui())),
        );
    f.render_widget(popup, area);
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
