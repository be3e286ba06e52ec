//! Terminal rendering: a `Surface` that rasterises the arena into a grid of
//! character cells, then flushes the grid with crossterm commands.
//!
//! No game logic lives here; `Game::draw` decides what is visible and this
//! module only decides how it looks in a terminal.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::assets::Sprite;
use space_shooter::geometry::{Arena, CollisionRect, Placement, Vector2};
use space_shooter::surface::{Surface, Tint};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_LASER_PLAYER: Color = Color::Cyan;
const C_LASER_ENEMY: Color = Color::Magenta;
const C_PICKUP: Color = Color::Yellow;
const C_PLACEHOLDER: Color = Color::DarkGrey;

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::White => Color::White,
        Tint::Grey => Color::DarkGrey,
        Tint::Red => Color::Red,
        Tint::Green => Color::Green,
        Tint::Blue => Color::Blue,
        Tint::Yellow => Color::Yellow,
        Tint::Golden => Color::DarkYellow,
        Tint::Cyan => Color::Cyan,
    }
}

/// Rows of glyphs drawn for a sprite, centred on its placement.
fn sprite_glyphs(name: &str) -> (&'static [&'static str], Color) {
    match name {
        "player" => (&["▲", "/█\\"], C_PLAYER),
        "enemy" => (&["«▼»", "╚═╝"], C_ENEMY),
        "boss" => (&["╔═▼═╗", "║(◎)║", "╚═══╝"], C_BOSS),
        "laser_blue" => (&["║"], C_LASER_PLAYER),
        "laser_red" => (&["↓"], C_LASER_ENEMY),
        "pill_blue" => (&["♥"], C_PICKUP),
        "bolt_bronze" => (&["↑"], C_PICKUP),
        "blue_box_bolt" => (&["✚"], C_PICKUP),
        "blue_box_star" => (&["★"], C_PICKUP),
        _ => (&["?"], C_PLACEHOLDER),
    }
}

// ── Cell grid ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    arena: Arena,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, arena: Arena) -> Self {
        let mut surface = TerminalSurface {
            cols: 0,
            rows: 0,
            arena,
            cells: Vec::new(),
        };
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(3);
        self.rows = rows.max(3);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Arena point under a terminal cell; used to map mouse events back.
    pub fn cell_to_arena(&self, col: u16, row: u16) -> Vector2 {
        let (inner_w, inner_h) = self.inner_size();
        Vector2::new(
            (col.saturating_sub(1) as f64 + 0.5) * self.arena.width / inner_w,
            (row.saturating_sub(1) as f64 + 0.5) * self.arena.height / inner_h,
        )
    }

    /// Playfield size in cells, inside the border.
    fn inner_size(&self) -> (f64, f64) {
        ((self.cols - 2) as f64, (self.rows - 2) as f64)
    }

    fn arena_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        let (inner_w, inner_h) = self.inner_size();
        let col = (x / self.arena.width * inner_w).floor() as i32 + 1;
        let row = (y / self.arena.height * inner_h).floor() as i32 + 1;
        (col, row)
    }

    /// Write into the playfield; anything on or past the border is dropped.
    fn put(&mut self, col: i32, row: i32, glyph: char, color: Color) {
        if col < 1 || row < 1 || col >= self.cols as i32 - 1 || row >= self.rows as i32 - 1 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = Cell { glyph, color };
    }

    fn put_str(&mut self, col: i32, row: i32, text: &str, color: Color) {
        for (i, glyph) in text.chars().enumerate() {
            self.put(col + i as i32, row, glyph, color);
        }
    }

    // ── Flush ─────────────────────────────────────────────────────────────────

    /// Queue the whole frame (border plus grid) and flush it.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border(out)?;

        for row in 1..self.rows - 1 {
            let start = row as usize * self.cols as usize;
            let line = &self.cells[start..start + self.cols as usize];

            out.queue(cursor::MoveTo(1, row))?;
            let mut current = None;
            for cell in &line[1..line.len() - 1] {
                if current != Some(cell.color) {
                    out.queue(style::SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                out.queue(Print(cell.glyph))?;
            }
        }

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows - 1))?;
        out.flush()
    }

    fn draw_border<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let inner = self.cols as usize - 2;
        out.queue(style::SetForegroundColor(C_BORDER))?;

        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        out.queue(cursor::MoveTo(0, self.rows - 1))?;
        out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

        for row in 1..self.rows - 1 {
            out.queue(cursor::MoveTo(0, row))?;
            out.queue(Print("│"))?;
            out.queue(cursor::MoveTo(self.cols - 1, row))?;
            out.queue(Print("│"))?;
        }
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn draw_sprite(&mut self, sprite: &Sprite, placement: &Placement) {
        let (glyphs, color) = sprite_glyphs(&sprite.name);
        let (col, row) = self.arena_to_cell(placement.position.x, placement.position.y);
        let top = row - glyphs.len() as i32 / 2;

        for (i, line) in glyphs.iter().enumerate() {
            let left = col - line.chars().count() as i32 / 2;
            self.put_str(left, top + i as i32, line, color);
        }
    }

    fn stroke_rect(&mut self, rect: &CollisionRect, tint: Tint) {
        let color = tint_color(tint);
        let (c0, r0) = self.arena_to_cell(rect.x0 as f64, rect.y0 as f64);
        let (c1, r1) = self.arena_to_cell(rect.x1 as f64, rect.y1 as f64);

        for col in c0..=c1 {
            self.put(col, r0, '·', color);
            self.put(col, r1, '·', color);
        }
        for row in r0..=r1 {
            self.put(c0, row, '·', color);
            self.put(c1, row, '·', color);
        }
    }

    fn fill_rect(&mut self, rect: &CollisionRect, tint: Tint) {
        let color = tint_color(tint);
        let (c0, r0) = self.arena_to_cell(rect.x0 as f64, rect.y0 as f64);
        let (c1, r1) = self.arena_to_cell(rect.x1 as f64, rect.y1 as f64);

        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put(col, row, '█', color);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, tint: Tint) {
        let (col, row) = self.arena_to_cell(x, y);
        let left = col - text.chars().count() as i32 / 2;
        self.put_str(left, row, text, tint_color(tint));
    }
}
