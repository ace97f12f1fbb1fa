use ratatui::layout::Rect;

/// A centered popup rect of up to `width` x `height`, clamped to the area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_clamped_and_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(area, 40, 10);
        assert_eq!(rect, Rect::new(20, 7, 40, 10));

        let oversized = centered_rect(area, 200, 100);
        assert_eq!(oversized, area);
    }
}
