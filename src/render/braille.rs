use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::color::RgbColor;

/// Braille dot positions within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
pub const DOT_MAP: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

/// A canvas for sub-character braille rendering.
/// Each terminal character cell maps to a 2x4 grid of braille dots; every set
/// dot remembers the depth of the nearest point drawn onto it.
pub struct BrailleCanvas {
    pub grid: Vec<Option<f32>>,
    pub grid_w: usize,
    pub grid_h: usize,
    char_w: usize,
    char_h: usize,
}

impl BrailleCanvas {
    /// Create a new braille canvas for the given character dimensions.
    pub fn new(char_w: usize, char_h: usize) -> Self {
        let grid_w = char_w * 2;
        let grid_h = char_h * 4;
        Self {
            grid: vec![None; grid_w * grid_h],
            grid_w,
            grid_h,
            char_w,
            char_h,
        }
    }

    /// Set a single dot (bounds-checked), keeping the nearer depth.
    #[inline]
    pub fn set(&mut self, gx: isize, gy: isize, depth: f32) {
        if gx < 0 || gy < 0 || gx as usize >= self.grid_w || gy as usize >= self.grid_h {
            return;
        }
        let slot = &mut self.grid[gy as usize * self.grid_w + gx as usize];
        *slot = Some(match *slot {
            Some(existing) => existing.min(depth),
            None => depth,
        });
    }

    /// Stamp a round point of `diameter` dots centred on (gx, gy).
    pub fn stamp(&mut self, gx: isize, gy: isize, diameter: usize, depth: f32) {
        if diameter <= 1 {
            self.set(gx, gy, depth);
            return;
        }
        let base = (diameter as isize - 1) / 2;
        let center = (diameter as f32 - 1.0) / 2.0;
        let radius_sq = (diameter as f32 / 2.0).powi(2);
        for dy in 0..diameter {
            for dx in 0..diameter {
                let fx = dx as f32 - center;
                let fy = dy as f32 - center;
                if fx * fx + fy * fy <= radius_sq {
                    self.set(gx - base + dx as isize, gy - base + dy as isize, depth);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn is_set(&self, gx: usize, gy: usize) -> bool {
        gx < self.grid_w && gy < self.grid_h && self.grid[gy * self.grid_w + gx].is_some()
    }

    /// Encode the grid to braille characters and write them into `buf`.
    /// Every cell of `area` gets `background`; cells with dots get the color
    /// `color_fn` returns for the nearest depth in that cell.
    pub fn render(
        &self,
        buf: &mut Buffer,
        area: Rect,
        background: RgbColor,
        color_fn: impl Fn(f32) -> RgbColor,
    ) {
        let bg = background.to_color();
        for cy in 0..self.char_h.min(area.height as usize) {
            for cx in 0..self.char_w.min(area.width as usize) {
                let mut braille: u8 = 0;
                let mut nearest: Option<f32> = None;

                for (dx, col) in DOT_MAP.iter().enumerate() {
                    for (dy, &bit) in col.iter().enumerate() {
                        let gx = cx * 2 + dx;
                        let gy = cy * 4 + dy;
                        if let Some(depth) = self.grid[gy * self.grid_w + gx] {
                            braille |= bit;
                            nearest = Some(nearest.map_or(depth, |n: f32| n.min(depth)));
                        }
                    }
                }

                let Some(cell) = buf.cell_mut((area.x + cx as u16, area.y + cy as u16)) else {
                    continue;
                };
                cell.set_bg(bg);
                match nearest {
                    Some(depth) => {
                        let ch = char::from_u32(0x2800 + braille as u32).unwrap_or(' ');
                        cell.set_char(ch);
                        cell.set_fg(color_fn(depth).to_color());
                    }
                    None => {
                        cell.set_char(' ');
                    }
                }
            }
        }
    }
}
