//! Terminal-based world explorer using ratatui
//!
//! Plays the host role for a [`WorldSession`]: draws the tiles around a
//! cursor, forwards clicks as tile activations and forwards world key changes
//! as reseeds. Navigate with arrow keys, space to pitch/strike a tent.

use std::error::Error;
use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ascii::{tile_glyph, AsciiMode};
use crate::coords::TileCoord;
use crate::export::{export_region_png, DEFAULT_CELL_SIZE};
use crate::tilemap::sample_around;
use crate::world::WorldSession;

/// Side length of the square exported with `E`
const EXPORT_SIZE: usize = 96;

/// Create a darker background color from a terrain color so glyphs stand out.
fn make_bg_color(r: u8, g: u8, b: u8) -> Color {
    let factor = 0.55;
    Color::Rgb(
        (r as f32 * factor) as u8,
        (g as f32 * factor) as u8,
        (b as f32 * factor) as u8,
    )
}

/// File name for a minimap of the world named `key`. Anything but ASCII
/// letters and digits becomes `_`, so the file stays in the working directory.
fn export_filename(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("camping_{}.png", safe)
}

/// Explorer state
struct Explorer {
    session: WorldSession,
    cursor: TileCoord,
    view_mode: AsciiMode,
    show_help: bool,
    show_panel: bool,
    /// Message to display temporarily
    message: Option<String>,
    /// Pending world key while the user is typing one
    key_input: Option<String>,
}

impl Explorer {
    fn new(session: WorldSession) -> Self {
        Explorer {
            session,
            cursor: TileCoord::new(0, 0),
            view_mode: AsciiMode::Full,
            show_help: false,
            show_panel: true,
            message: None,
            key_input: None,
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.cursor = self.cursor.offset(dx, dy);
    }

    fn activate_cursor(&mut self) {
        let coord = self.cursor;
        if self.session.activate_tile(coord) {
            let view = self.session.query_tile(coord);
            self.message = Some(if view.structure_present {
                format!("Tent pitched at {}", coord)
            } else {
                format!("Tent removed at {}", coord)
            });
        } else {
            self.message = Some("Can't camp on water".to_string());
        }
    }

    fn apply_key(&mut self, key: &str) {
        self.session.reseed(key);
        self.message = Some(format!("World key: {} (seed {})", key, self.session.seed()));
    }

    fn random_world(&mut self) {
        let key = format!("{:08x}", rand::random::<u32>());
        self.apply_key(&key);
    }

    fn export(&mut self) {
        let filename = export_filename(self.session.key());
        let region = sample_around(&mut self.session, self.cursor, EXPORT_SIZE, EXPORT_SIZE);
        let palette = self.session.params().palette.clone();
        self.message = Some(match export_region_png(&region, &palette, DEFAULT_CELL_SIZE, &filename) {
            Ok(_) => format!("Exported: {}", filename),
            Err(e) => format!("Export failed: {}", e),
        });
    }

    /// World tile under a screen cell of the map area.
    fn screen_to_tile(&self, area: Rect, column: u16, row: u16) -> Option<TileCoord> {
        if column < area.x || row < area.y || column >= area.x + area.width || row >= area.y + area.height {
            return None;
        }
        let dx = (column - area.x) as i32 - area.width as i32 / 2;
        let dy = (row - area.y) as i32 - area.height as i32 / 2;
        Some(self.cursor.offset(dx, dy))
    }

    fn render_map(&mut self, area: Rect, buf: &mut Buffer) {
        let palette = self.session.params().palette.clone();
        let selection = self.session.selection(self.cursor);

        for sy in 0..area.height {
            for sx in 0..area.width {
                let coord = self.cursor.offset(
                    sx as i32 - area.width as i32 / 2,
                    sy as i32 - area.height as i32 / 2,
                );
                let view = self.session.query_tile(coord);
                let (ch, (fr, fg, fb)) = tile_glyph(&view, &palette, self.view_mode);
                let (r, g, b) = view.terrain.color();

                let style = if coord == self.cursor {
                    // Red over water, green over land
                    let bg = if selection.interactable { Color::Green } else { Color::Red };
                    Style::default().fg(Color::Black).bg(bg)
                } else {
                    Style::default().fg(Color::Rgb(fr, fg, fb)).bg(make_bg_color(r, g, b))
                };

                if let Some(cell) = buf.cell_mut((area.x + sx, area.y + sy)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }

    fn render_tile_panel(&mut self, area: Rect, buf: &mut Buffer) {
        let coord = self.cursor;
        let view = self.session.query_tile(coord);
        let count = self.session.interaction_count(coord);
        let stats = self.session.cache_stats();
        let decor_str = self
            .session
            .decor_kind(view.decor)
            .map(|kind| kind.display_name())
            .unwrap_or_else(|| "None".to_string());

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let body = Style::default().fg(Color::White);
        let (tr, tg, tb) = view.terrain.color();

        let lines: Vec<(String, Style)> = vec![
            (
                format!(" {}", view.terrain.display_name()),
                Style::default().fg(Color::Rgb(tr, tg, tb)).add_modifier(Modifier::BOLD),
            ),
            (String::new(), body),
            (" Tile".to_string(), heading),
            (format!("  Position: {}", coord), body),
            (format!("  Decor: {}", decor_str), body),
            (
                format!("  Tent: {}", if view.structure_present { "yes" } else { "no" }),
                body,
            ),
            (format!("  Clicks: {}", count), Style::default().fg(Color::Gray)),
            (String::new(), body),
            (" World".to_string(), heading),
            (format!("  Key: {}", self.session.key()), body),
            (format!("  Seed: {}", self.session.seed()), body),
            (String::new(), body),
            (" Cache".to_string(), heading),
            (format!("  Terrain: {}", stats.terrain_entries), Style::default().fg(Color::Gray)),
            (format!("  Decor: {}", stats.decor_entries), Style::default().fg(Color::Gray)),
            (format!("  Clicked: {}", stats.interaction_entries), Style::default().fg(Color::Gray)),
        ];

        let block = Block::default()
            .title(" Tile Info ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, (line, style)) in lines.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let display_line: String = line.chars().take(inner.width as usize).collect();
            buf.set_string(inner.x, inner.y + i as u16, &display_line, *style);
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help_text = [
            "=== Camping World Explorer ===",
            "",
            "Navigation:",
            "  Arrow keys / WASD / HJKL - Move cursor",
            "  PgUp/PgDn - Fast vertical movement",
            "  Home/End - Fast horizontal movement",
            "",
            "Camping:",
            "  Space / Enter / Click - Pitch or strike tent",
            "",
            "World:",
            "  N - Type a new world key",
            "  R - Random world key",
            "  V - Toggle decor layer",
            "  E - Export area around cursor as PNG",
            "  I / Tab - Toggle info panel",
            "  ? - Toggle this help",
            "  Q / Esc - Quit",
            "",
            "Press any key to close",
        ];

        let width = 50;
        let height = help_text.len() as u16 + 2;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(x, y, width.min(area.width), height.min(area.height));

        Clear.render(help_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::DarkGray));

        let inner = block.inner(help_area);
        block.render(help_area, buf);

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            buf.set_string(inner.x, inner.y + i as u16, line, Style::default().fg(Color::White));
        }
    }

    fn status_line(&self) -> String {
        if let Some(input) = &self.key_input {
            return format!(" New world key: {}_  (Enter to apply, Esc to cancel)", input);
        }
        let msg_str = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        format!(
            " {} | key:{} | {}{} | Space:Tent  N:Key  ?:Help  Q:Quit",
            self.cursor,
            self.session.key(),
            self.view_mode.name(),
            msg_str,
        )
    }

    /// Handle a key while typing a world key. Returns true when consumed.
    fn handle_key_input(&mut self, code: KeyCode) -> bool {
        let Some(input) = self.key_input.as_mut() else {
            return false;
        };
        match code {
            KeyCode::Enter => {
                let key = input.clone();
                self.key_input = None;
                if key.is_empty() {
                    self.message = Some("World key unchanged".to_string());
                } else {
                    self.apply_key(&key);
                }
            }
            KeyCode::Esc => self.key_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        true
    }
}

/// Split the screen into map, optional side panel and status bar.
fn layout(size: Rect, show_panel: bool) -> (Rect, Option<Rect>, Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    if show_panel {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(28)])
            .split(main_chunks[0]);
        (content_chunks[0], Some(content_chunks[1]), main_chunks[1])
    } else {
        (main_chunks[0], None, main_chunks[1])
    }
}

pub fn run_explorer(session: WorldSession) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut explorer = Explorer::new(session);
    let mut map_area = Rect::default();

    loop {
        terminal.draw(|f| {
            let (map, panel, status_area) = layout(f.area(), explorer.show_panel);
            map_area = map;

            explorer.render_map(map, f.buffer_mut());
            if let Some(panel) = panel {
                explorer.render_tile_panel(panel, f.buffer_mut());
            }

            let status_para = Paragraph::new(explorer.status_line())
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status_para, status_area);

            if explorer.show_help {
                explorer.render_help(map, f.buffer_mut());
            }
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if explorer.handle_key_input(key.code) {
                        continue;
                    }
                    if explorer.show_help {
                        explorer.show_help = false;
                        continue;
                    }
                    explorer.message = None;

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('?') => explorer.show_help = true,

                        // Movement
                        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => explorer.move_cursor(0, -1),
                        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => explorer.move_cursor(0, 1),
                        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => explorer.move_cursor(-1, 0),
                        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => explorer.move_cursor(1, 0),
                        KeyCode::PageUp => explorer.move_cursor(0, -20),
                        KeyCode::PageDown => explorer.move_cursor(0, 20),
                        KeyCode::Home => explorer.move_cursor(-20, 0),
                        KeyCode::End => explorer.move_cursor(20, 0),

                        KeyCode::Char(' ') | KeyCode::Enter => explorer.activate_cursor(),

                        KeyCode::Char('n') | KeyCode::Char('N') => {
                            explorer.key_input = Some(String::new());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => explorer.random_world(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            explorer.view_mode = match explorer.view_mode {
                                AsciiMode::Full => AsciiMode::Terrain,
                                AsciiMode::Terrain => AsciiMode::Full,
                            };
                        }
                        KeyCode::Char('e') | KeyCode::Char('E') => explorer.export(),
                        KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('I') => {
                            explorer.show_panel = !explorer.show_panel;
                        }
                        _ => {}
                    }
                }
                Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                    // Click selects the tile and activates it, like a host click event
                    if let Some(coord) = explorer.screen_to_tile(map_area, column, row) {
                        explorer.cursor = coord;
                        explorer.activate_cursor();
                    }
                }
                _ => {}
            }
        }
    }

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_tile_centers_on_cursor() {
        let mut explorer = Explorer::new(WorldSession::new());
        explorer.cursor = TileCoord::new(5, -3);
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(explorer.screen_to_tile(area, 10, 5), Some(TileCoord::new(5, -3)));
        assert_eq!(explorer.screen_to_tile(area, 0, 0), Some(TileCoord::new(-5, -8)));
        assert_eq!(explorer.screen_to_tile(area, 20, 5), None);
    }

    #[test]
    fn test_export_filename_stays_local() {
        assert_eq!(export_filename("default"), "camping_default.png");
        assert_eq!(export_filename("../../etc/passwd"), format!("camping_{}etc_passwd.png", "_".repeat(6)));
        assert_eq!(export_filename("/tmp/x y"), "camping__tmp_x_y.png");
        assert!(!export_filename("a/../b").contains('/'));
    }

    #[test]
    fn test_key_input_reseeds_on_enter() {
        let mut explorer = Explorer::new(WorldSession::new());
        explorer.key_input = Some(String::new());
        for c in "lake".chars() {
            assert!(explorer.handle_key_input(KeyCode::Char(c)));
        }
        assert!(explorer.handle_key_input(KeyCode::Enter));
        assert_eq!(explorer.session.key(), "lake");
        assert!(explorer.key_input.is_none());
        assert!(!explorer.handle_key_input(KeyCode::Char('x')));
    }

    #[test]
    fn test_render_map_fills_area() {
        let mut explorer = Explorer::new(WorldSession::new());
        let area = Rect::new(0, 0, 12, 6);
        let mut buf = Buffer::empty(area);
        explorer.render_map(area, &mut buf);
        assert!(explorer.session.cache_stats().terrain_entries >= 72);
        let center = buf.cell((6u16, 3u16)).map(|c| c.symbol().to_string());
        assert!(center.is_some_and(|s| s != " "));
    }
}
