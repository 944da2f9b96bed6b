//! Character-cell front-end for native builds
//!
//! The playfield is sampled onto a 36x32 grid (one cell = 8x16 field
//! pixels), composed into a `Grid`, then written out with `queue!` and
//! flushed once per frame.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::hud::{self, HudLines, Overlay};
use super::shapes::{beam_pulse, coin_spin};
use super::stars::Starfield;
use super::vertex::colors;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::settings::Settings;
use crate::sim::{Craft, HazardPair, Snapshot, Token};

pub const GRID_COLS: usize = 36;
pub const GRID_ROWS: usize = 32;

const CELL_W: f32 = FIELD_WIDTH / GRID_COLS as f32;
const CELL_H: f32 = FIELD_HEIGHT / GRID_ROWS as f32;

const BG: Color = Color::Rgb { r: 5, g: 10, b: 30 };
const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const GREY: Color = Color::Rgb { r: 180, g: 180, b: 180 };
const SCORE_CYAN: Color = Color::Rgb { r: 100, g: 255, b: 255 };
const LIVES_RED: Color = Color::Rgb { r: 255, g: 100, b: 100 };
const GAME_OVER_RED: Color = Color::Rgb { r: 255, g: 50, b: 50 };
const NAME_YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };

fn rgb(c: [f32; 4]) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(c[0]),
        g: channel(c[1]),
        b: channel(c[2]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: WHITE };
}

/// A frame of character cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range writes are dropped
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { ch, fg };
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    pub fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    pub fn put_centered(&mut self, y: i32, s: &str, fg: Color) {
        let len = s.chars().count() as i32;
        self.put_str((self.width as i32 - len) / 2, y, s, fg);
    }

    /// Text of one row, for inspection
    pub fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

/// Grid cell containing a field point
fn to_cell(x: f32, y: f32) -> (i32, i32) {
    ((x / CELL_W).floor() as i32, (y / CELL_H).floor() as i32)
}

/// Grid row for an overlay line laid out at field height `y`
fn row_at(y: f32) -> i32 {
    (y / CELL_H).floor() as i32
}

fn draw_stars(grid: &mut Grid, stars: &Starfield) {
    for (x, star) in stars.visible() {
        let (cx, cy) = to_cell(x, star.y);
        let ch = if star.size >= 2.0 { '*' } else { '.' };
        grid.set(cx, cy, ch, rgb(star.color));
    }
}

fn draw_token(grid: &mut Grid, token: &Token, settings: &Settings, frame: u64) {
    let spin = coin_spin(token, settings, frame);
    let ch = match spin {
        s if s > 0.66 => 'O',
        s if s > 0.33 => 'o',
        _ => '|',
    };
    let (cx, cy) = to_cell(token.x, token.y);
    grid.set(cx, cy, ch, GOLD);
}

fn draw_hazard(grid: &mut Grid, hazard: &HazardPair, settings: &Settings, frame: u64) {
    let pulse = beam_pulse(hazard, settings, frame);
    let core = rgb([pulse, 100.0 / 255.0 * pulse, 20.0 / 255.0, 1.0]);
    let emitter = rgb(colors::EMITTER);

    let first_col = (hazard.x / CELL_W).floor() as i32;
    let last_col = ((hazard.trailing_edge() / CELL_W).ceil() as i32 - 1).max(first_col);
    let gap_bottom = hazard.gap_top + hazard.gap;

    for row in 0..GRID_ROWS as i32 {
        let top = row as f32 * CELL_H;
        let bottom = top + CELL_H;
        // Any overlap with a beam lights the cell
        let in_top = top < hazard.gap_top;
        let in_bottom = bottom > gap_bottom;
        if !in_top && !in_bottom {
            continue;
        }
        let at_edge = (in_top && bottom >= hazard.gap_top) || (in_bottom && top <= gap_bottom);
        let (ch, fg) = if at_edge { ('=', emitter) } else { ('#', core) };
        for col in first_col..=last_col {
            grid.set(col, row, ch, fg);
        }
    }
}

fn draw_craft(grid: &mut Grid, craft: &Craft, invincible: bool, settings: &Settings, frame: u64) {
    let flashing = invincible && settings.blink_when_invincible() && (frame / 5) % 2 == 0;
    let (body, cockpit) = if flashing {
        (colors::CRAFT_BODY_FLASH, colors::CRAFT_COCKPIT_FLASH)
    } else {
        (colors::CRAFT_BODY, colors::CRAFT_COCKPIT)
    };
    // Nose follows the tilt
    let nose = match craft.vel {
        v if v < -2.0 => '/',
        v if v > 2.0 => '\\',
        _ => '>',
    };
    let flame = if frame % 4 < 2 { '~' } else { '-' };

    let (cx, cy) = to_cell(craft.x, craft.y);
    grid.set(cx - 2, cy, flame, rgb(colors::FLAMES[((frame / 3) % 3) as usize]));
    grid.set(cx - 1, cy, '=', rgb(body));
    grid.set(cx, cy, nose, rgb(cockpit));
}

fn draw_hud(grid: &mut Grid, snapshot: &Snapshot<'_>) {
    let hud = HudLines::from_snapshot(snapshot);
    grid.put_str(0, 0, &hud.lives, LIVES_RED);
    grid.put_centered(0, &hud.score, SCORE_CYAN);
    let coins_x = GRID_COLS as i32 - hud.coins.chars().count() as i32;
    grid.put_str(coins_x, 0, &hud.coins, GOLD);
}

fn draw_overlay(grid: &mut Grid, snapshot: &Snapshot<'_>) {
    match Overlay::from(snapshot.mode) {
        Overlay::None => {}
        Overlay::NameEntry => {
            grid.put_centered(row_at(40.0), hud::HIGH_SCORE_BANNER, GOLD);
            grid.put_centered(row_at(180.0), hud::NAME_PROMPT, WHITE);
            grid.put_centered(row_at(220.0), &hud::name_field(snapshot.name_buffer), NAME_YELLOW);
            grid.put_centered(row_at(280.0), hud::SUBMIT_HINT, GREY);
        }
        Overlay::Board => {
            grid.put_centered(row_at(80.0), hud::BOARD_TITLE, WHITE);
            for (i, row) in hud::board_rows(snapshot.leaderboard, snapshot.highlight_score)
                .iter()
                .enumerate()
            {
                let fg = if row.highlighted { GOLD } else { WHITE };
                grid.put_centered(row_at(120.0) + 2 * i as i32, &row.text, fg);
            }
            grid.put_centered(row_at(FIELD_HEIGHT - 60.0), hud::RESTART_HINT, GAME_OVER_RED);
        }
    }
}

/// Compose a full frame
pub fn compose(
    snapshot: &Snapshot<'_>,
    stars: Option<&Starfield>,
    settings: &Settings,
    frame: u64,
) -> Grid {
    let mut grid = Grid::new(GRID_COLS, GRID_ROWS);

    if let Some(stars) = stars.filter(|_| settings.quality.starfield_enabled()) {
        draw_stars(&mut grid, stars);
    }
    for token in snapshot.tokens {
        draw_token(&mut grid, token, settings, frame);
    }
    for hazard in snapshot.hazards {
        draw_hazard(&mut grid, hazard, settings, frame);
    }
    draw_craft(&mut grid, snapshot.craft, snapshot.invincible, settings, frame);
    draw_hud(&mut grid, snapshot);
    draw_overlay(&mut grid, snapshot);
    grid
}

/// Owns the terminal while the game runs
pub struct TerminalView {
    writer: BufWriter<Stdout>,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::with_capacity(16384, io::stdout()),
        }
    }

    /// Raw mode, alternate screen, hidden cursor
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            SetBackgroundColor(BG),
            Clear(ClearType::All)
        )
    }

    pub fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        queue!(self.writer, SetBackgroundColor(BG))?;
        let mut current_fg = None;
        for y in 0..grid.height() {
            queue!(self.writer, MoveTo(0, y as u16))?;
            for x in 0..grid.width() {
                let cell = grid.get(x, y);
                if current_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    current_fg = Some(cell.fg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }

    /// Give the terminal back; safe to call after a failed `init`
    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}
