use crate::{Coords, TermInt};
use crate::geometry::{Position, Size};
use crate::render::{Canvas, Hud};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{ensure, Context, Result};
use crossterm::{cursor, execute, queue, style::{self, Color}, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const FILL_CHAR: char = '█';
const TIME_BAR_WIDTH: usize = 20;

/// How many canvas pixels one terminal cell covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelScale {
    pub px_per_column: i32,
    pub px_per_row: i32,
}

#[derive(Copy, Clone, PartialEq)]
struct Glyph {
    ch: char,
    color: Color,
}

const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

/// Terminal canvas: a bordered play area with the HUD line under it.
///
/// Drawing only touches an in-memory screen; `flush` writes the cells that
/// changed since the last flush.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    dirty: Vec<bool>,
    current_msg: Option<Message>,
    scale: PixelScale,
    canvas_cols: TermInt,
    canvas_rows: TermInt,
    score_text: String,
    time_text: String,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(canvas: Size, scale: PixelScale) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        let canvas_cols = cells_needed(canvas.width, scale.px_per_column);
        let canvas_rows = cells_needed(canvas.height, scale.px_per_row);

        // Border on every side, plus the HUD line
        let (need_w, need_h) = (canvas_cols as u32 + 2, canvas_rows as u32 + 3);
        ensure!(
            need_w <= width as u32 && need_h <= height as u32,
            "terminal is {}x{} but a {}x{} px canvas needs {}x{} cells; resize the terminal or change the pixel scale",
            width, height, canvas.width, canvas.height, need_w, need_h
        );

        let cells = width as usize * height as usize;
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![BLANK; cells],
            dirty: vec![false; cells],
            current_msg: None,
            scale,
            canvas_cols,
            canvas_rows,
            score_text: String::new(),
            time_text: String::new(),
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("failed to hide cursor")?;
        self.active = true;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)
            .context("failed to show cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("failed to leave alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("failed to read terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the first key, then drains whatever else is queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("failed to poll terminal events")? {
            if let Event::Key(ev) = read().context("failed to read terminal event")? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn draw_borders(&mut self) {
        let end_x = self.canvas_cols + 1;
        let end_y = self.canvas_rows + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.put((x, 0), Glyph { ch, color: Color::Reset });
            self.put((x, end_y), Glyph { ch, color: Color::Reset });
        }

        for y in 1..end_y {
            self.put((0, y), Glyph { ch: '|', color: Color::Reset });
            self.put((end_x, y), Glyph { ch: '|', color: Color::Reset });
        }
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = ((self.canvas_cols + 2) / 2, (self.canvas_rows + 2) / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        for y_diff in 0..msg_height {
            let line = match y_diff {
                0 => "",
                d if d == msg_height - 1 => "",
                d => lines[d as usize - 1],
            };
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1 + y_diff), style::ResetColor, style::Print(padded_line))?;
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.stdout.flush().context("failed to flush stdout")?;
        Ok(())
    }

    /// Marks the covered cells so the next flush paints the screen back.
    pub fn hide_message(&mut self) {
        if let Some(msg) = self.current_msg.take() {
            let top_left = msg.top_left();
            for y_diff in 0..msg.height() {
                for x_diff in 0..msg.width() {
                    self.mark_dirty((top_left.0 + x_diff, top_left.1 + y_diff));
                }
            }
        }
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    /// Wipes the physical screen; the next flush paints the whole buffer again.
    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("failed to clear terminal")?;
        self.dirty = vec![true; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index((x, y));
                if !self.dirty[idx] {
                    continue;
                }
                self.dirty[idx] = false;

                // Cells under a message stay marked hidden until it goes away
                if self.under_message((x, y)) {
                    continue;
                }

                let glyph = self.screen[idx];
                queue!(self.stdout, cursor::MoveTo(x, y), style::SetForegroundColor(glyph.color), style::Print(glyph.ch))?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.stdout.flush().context("failed to flush stdout")?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    fn put(&mut self, pos: Coords, glyph: Glyph) {
        if pos.0 >= self.width || pos.1 >= self.height {
            return;
        }
        let idx = self.index(pos);
        if self.screen[idx] != glyph {
            self.screen[idx] = glyph;
            self.dirty[idx] = true;
        }
    }

    fn mark_dirty(&mut self, pos: Coords) {
        if pos.0 < self.width && pos.1 < self.height {
            let idx = self.index(pos);
            self.dirty[idx] = true;
        }
    }

    fn under_message(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| {
            let (left, top) = msg.top_left();
            pos.0 >= left && pos.0 < left + msg.width() && pos.1 >= top && pos.1 < top + msg.height()
        })
    }

    /// Terminal cells covered by a pixel rectangle, clipped to the play area.
    fn cells_for(&self, position: Position, size: Size) -> Vec<Coords> {
        let PixelScale { px_per_column, px_per_row } = self.scale;
        let cols = cell_span(position.x, size.width, px_per_column, self.canvas_cols);
        let rows = cell_span(position.y, size.height, px_per_row, self.canvas_rows);

        let mut cells = vec![];
        for row in rows {
            for col in cols.clone() {
                cells.push((col as TermInt + 1, row as TermInt + 1));
            }
        }
        cells
    }

    fn draw_hud(&mut self) {
        let y = self.canvas_rows + 2;
        let line = format!("Score: {}   Time: {}", self.score_text, self.time_text);
        let chars: Vec<char> = line.chars().collect();

        for x in 0..self.canvas_cols + 2 {
            let ch = chars.get(x as usize).copied().unwrap_or(' ');
            self.put((x, y), Glyph { ch, color: Color::Reset });
        }
    }
}

impl Canvas for TermManager {
    fn draw_rect(&mut self, position: Position, size: Size, color: Color) {
        for cell in self.cells_for(position, size) {
            self.put(cell, Glyph { ch: FILL_CHAR, color });
        }
    }

    fn clear_rect(&mut self, position: Position, size: Size) {
        for cell in self.cells_for(position, size) {
            self.put(cell, BLANK);
        }
    }
}

impl Hud for TermManager {
    fn show_score(&mut self, text: &str) {
        self.score_text = text.to_string();
        self.draw_hud();
    }

    fn show_time(&mut self, seconds: u32, percentage: &str) {
        self.time_text = format!("[{}] {}s", time_bar(percentage), seconds);
        self.draw_hud();
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::error!(?err, "failed to restore terminal");
        }
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

fn cells_needed(pixels: i32, px_per_cell: i32) -> TermInt {
    ((pixels + px_per_cell - 1) / px_per_cell).max(0) as TermInt
}

/// Columns (or rows) touched by `[start, start + len)`, clipped to `0..limit`.
fn cell_span(start: i32, len: i32, px_per_cell: i32, limit: TermInt) -> std::ops::Range<i32> {
    let first = start.max(0).div_euclid(px_per_cell);
    let end = (start + len).min(limit as i32 * px_per_cell);
    if end <= start.max(0) {
        return 0..0;
    }
    let last = (end - 1).div_euclid(px_per_cell);
    first..last + 1
}

/// `"50.00"` -> half of the bar filled.
fn time_bar(percentage: &str) -> String {
    let share = percentage.parse::<f64>().unwrap_or(0.0).clamp(0.0, 100.0) / 100.0;
    let filled = (share * TIME_BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), " ".repeat(TIME_BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_every_touched_cell() {
        assert_eq!(cell_span(0, 10, 5, 80), 0..2);
        assert_eq!(cell_span(3, 10, 5, 80), 0..3);
        assert_eq!(cell_span(100, 10, 10, 24), 10..11);
        assert_eq!(cell_span(103, 10, 10, 24), 10..12);
    }

    #[test]
    fn spans_are_clipped_to_the_canvas() {
        assert_eq!(cell_span(-4, 10, 5, 80), 0..2);
        assert_eq!(cell_span(-20, 10, 5, 80), 0..0);
        assert_eq!(cell_span(395, 10, 5, 80), 79..80);
        assert_eq!(cell_span(400, 10, 5, 80), 0..0);
    }

    #[test]
    fn cells_round_up() {
        assert_eq!(cells_needed(400, 5), 80);
        assert_eq!(cells_needed(401, 5), 81);
        assert_eq!(cells_needed(240, 10), 24);
    }

    #[test]
    fn time_bar_fills_by_share() {
        assert_eq!(time_bar("100.00"), "#".repeat(20));
        assert_eq!(time_bar("50.00"), format!("{}{}", "#".repeat(10), " ".repeat(10)));
        assert_eq!(time_bar("0.00"), " ".repeat(20));
    }
}
