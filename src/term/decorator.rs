use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::constants::OPACITY_MAX;
use crate::handle::{GrabHandleGroup, HandlePosition};

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, title: &str);

    /// Paints the drawable handles of `group` at the group's opacity.
    fn render_handles(&self, buffer: &mut Buffer, group: &GrabHandleGroup, bounds: Rect);
}

#[derive(Debug)]
pub struct OpenStepDecorator;

fn glyph(position: HandlePosition) -> &'static str {
    match position {
        HandlePosition::TopLeft => "↖",
        HandlePosition::Top => "↑",
        HandlePosition::TopRight => "↗",
        HandlePosition::Right => "→",
        HandlePosition::BottomRight => "↘",
        HandlePosition::Bottom => "↓",
        HandlePosition::BottomLeft => "↙",
        HandlePosition::Left => "←",
        HandlePosition::Middle => "✥",
    }
}

/// Blends the handle color against black by `opacity`.
pub fn shade(opacity: u16) -> Color {
    let level = (u32::from(opacity) * 255 / u32::from(OPACITY_MAX)) as u8;
    Color::Rgb(level / 4, level / 2, level)
}

fn put(buffer: &mut Buffer, bounds: Rect, x: u16, y: u16, symbol: &str, style: Style) {
    if x < bounds.x || y < bounds.y || x >= bounds.right() || y >= bounds.bottom() {
        return;
    }
    if let Some(cell) = buffer.cell_mut((x, y)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

impl WindowDecorator for OpenStepDecorator {
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, title: &str) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let header_style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);

        let left = rect.x;
        let top = rect.y;
        let right = rect.right().saturating_sub(1);
        let bottom = rect.bottom().saturating_sub(1);
        let header_y = top.saturating_add(1);

        // Header background & title
        if header_y < bottom {
            for x in left.saturating_add(1)..right {
                put(buffer, bounds, x, header_y, " ", header_style);
            }
            let title_len = title.chars().count() as u16;
            let header_width = right.saturating_sub(left).saturating_sub(1);
            if title_len <= header_width {
                let start_x = left + 1 + (header_width - title_len) / 2;
                for (idx, ch) in title.chars().enumerate() {
                    put(
                        buffer,
                        bounds,
                        start_x + idx as u16,
                        header_y,
                        &ch.to_string(),
                        header_style,
                    );
                }
            }
        }

        // Borders
        for x in left..=right {
            let (top_symbol, bottom_symbol) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            put(buffer, bounds, x, top, top_symbol, border_style);
            put(buffer, bounds, x, bottom, bottom_symbol, border_style);
        }
        for y in top.saturating_add(1)..bottom {
            put(buffer, bounds, left, y, "│", border_style);
            put(buffer, bounds, right, y, "│", border_style);
        }
    }

    fn render_handles(&self, buffer: &mut Buffer, group: &GrabHandleGroup, bounds: Rect) {
        let style = Style::default()
            .bg(shade(group.opacity()))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        for handle in group.drawable_handles() {
            let Some(area) = handle.rect().to_cell_rect() else {
                continue;
            };
            let mid_x = area.x + area.width / 2;
            let mid_y = area.y + area.height / 2;
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    let symbol = if x == mid_x && y == mid_y {
                        glyph(handle.position())
                    } else {
                        " "
                    };
                    put(buffer, bounds, x, y, symbol, style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_chrome_draws_corners_and_title() {
        let area = Rect::new(0, 0, 12, 5);
        let mut buffer = Buffer::empty(area);
        OpenStepDecorator.render_window(&mut buffer, area, area, "win");
        assert_eq!(buffer[(0, 0)].symbol(), "┌");
        assert_eq!(buffer[(11, 0)].symbol(), "┐");
        assert_eq!(buffer[(0, 4)].symbol(), "└");
        assert_eq!(buffer[(11, 4)].symbol(), "┘");
        let header: String = (1..11).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert_eq!(header.trim(), "win");
    }

    #[test]
    fn chrome_is_clipped_to_bounds() {
        let area = Rect::new(0, 0, 12, 5);
        let bounds = Rect::new(0, 0, 6, 5);
        let mut buffer = Buffer::empty(area);
        OpenStepDecorator.render_window(&mut buffer, area, bounds, "");
        assert_eq!(buffer[(11, 0)].symbol(), " ");
        assert_eq!(buffer[(5, 0)].symbol(), "─");
    }

    #[test]
    fn shade_scales_with_opacity() {
        assert_eq!(shade(0), Color::Rgb(0, 0, 0));
        assert_eq!(shade(OPACITY_MAX), Color::Rgb(63, 127, 255));
    }
}
