//! Input plumbing: normalized events, click targets and pixel→cell mapping.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A click/tap on a registered target, identified by its action ID.
    Click(u16),
}

/// A screen region (terminal cells) bound to an action ID.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last render, shared with the mouse handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame at the given terminal size.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Full-width target on one row of `area`; rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of tab labels laid out left to right.
    ///
    /// `tabs` holds `(label_width, action_id)`. Each target spans its label
    /// plus the separator to its right; the last one runs to the edge.
    pub fn register_tab_targets(&mut self, tabs: &[(u16, u16)], separator_width: u16, area: Rect) {
        let mut x = area.x;
        let right_edge = area.x + area.width;
        for (i, &(width, action_id)) in tabs.iter().enumerate() {
            if x >= right_edge {
                break;
            }
            let span = if i + 1 == tabs.len() {
                right_edge - x
            } else {
                (width + separator_width).min(right_edge - x)
            };
            self.add_click_target(Rect::new(x, area.y, span, area.height), action_id);
            x += span;
        }
    }

    /// Action under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Map a pixel offset inside the grid element to a terminal cell.
    pub fn cell_at(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<(u16, u16)> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        Some((col, row))
    }
}

/// Convert a pixel offset along one axis to a cell index, `None` outside.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}

/// Terminals narrower than this stack the journal under the main panel.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 80
}
