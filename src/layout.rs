//! Screen geometry shared by rendering and pointer handling.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

pub const CLOSE_LABEL: &str = "[ Close ]";
const MODAL_PERCENT: u32 = 80;

/// Main screen: bordered map above a one-line status bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    pub map: Rect,
    pub map_inner: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    ScreenLayout {
        map: chunks[0],
        map_inner: bordered_inner(chunks[0]),
        status: chunks[1],
    }
}

/// Detail modal centered over the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalLayout {
    pub outer: Rect,
    pub inner: Rect,
    pub close_button: Rect,
}

pub fn modal(area: Rect) -> ModalLayout {
    let width = percent_of(area.width);
    let height = percent_of(area.height);
    let outer = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    // Sits on the top border, right-aligned inside the corners
    let label_width = (CLOSE_LABEL.len() as u16).min(outer.width.saturating_sub(2));
    let close_button = Rect::new(
        (outer.x + outer.width).saturating_sub(1 + label_width),
        outer.y,
        label_width,
        1.min(outer.height),
    );

    ModalLayout {
        outer,
        inner: bordered_inner(outer),
        close_button,
    }
}

fn percent_of(len: u16) -> u16 {
    (u32::from(len) * MODAL_PERCENT / 100) as u16
}

fn bordered_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Braille canvas size for a character area
pub fn canvas_pixels(inner: Rect) -> (usize, usize) {
    (inner.width as usize * 2, inner.height as usize * 4)
}

/// Braille pixel at the center of a terminal cell, if the cell is inside `inner`
pub fn cell_to_pixel(inner: Rect, col: u16, row: u16) -> Option<(i32, i32)> {
    if !contains(inner, col, row) {
        return None;
    }
    let px = (col - inner.x) as i32 * 2 + 1;
    let py = (row - inner.y) as i32 * 4 + 2;
    Some((px, py))
}

/// Terminal cell holding a Braille pixel, if it falls inside `inner`
pub fn pixel_to_cell(inner: Rect, px: i32, py: i32) -> Option<(u16, u16)> {
    if px < 0 || py < 0 {
        return None;
    }
    let cx = (px / 2) as u16;
    let cy = (py / 4) as u16;
    if cx >= inner.width || cy >= inner.height {
        return None;
    }
    Some((inner.x + cx, inner.y + cy))
}

pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Box for a one-line popup above its anchor cell, flipped below when it would
/// leave the top edge and shifted to stay within `inner`
pub fn popup_rect(inner: Rect, anchor: (u16, u16), text_width: u16) -> Rect {
    let width = text_width.saturating_add(4).min(inner.width);
    let height = 3.min(inner.height);

    let max_x = inner.x + inner.width - width;
    let x = anchor.0.saturating_sub(width / 2).clamp(inner.x, max_x);

    let y = if anchor.1 >= inner.y + height {
        anchor.1 - height
    } else {
        (anchor.1 + 1).min(inner.y + inner.height - height)
    };

    Rect::new(x, y, width, height)
}
