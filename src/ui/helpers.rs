use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Pick the first card to draw so the selected card is fully visible, showing
/// as many earlier cards as still fit above it.
pub(crate) fn first_visible_card(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut used = heights[selected] as u32;
    let mut start = selected;
    while start > 0 {
        let next = used + heights[start - 1] as u32;
        if next > available as u32 {
            break;
        }
        used = next;
        start -= 1;
    }
    start
}

/// Collapse a multi-line value onto one row for read-only cards.
pub(crate) fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_card_keeps_selection_in_view() {
        let heights = [7, 7, 9, 7];
        assert_eq!(first_visible_card(&heights, 0, 20), 0);
        assert_eq!(first_visible_card(&heights, 2, 20), 1);
        assert_eq!(first_visible_card(&heights, 3, 16), 2);
        assert_eq!(first_visible_card(&heights, 3, 10), 3);
        assert_eq!(first_visible_card(&heights, 3, 100), 0);
    }

    #[test]
    fn first_card_handles_empty_and_out_of_range() {
        assert_eq!(first_visible_card(&[], 3, 10), 0);
        assert_eq!(first_visible_card(&[5, 5], 9, 5), 1);
    }

    #[test]
    fn single_line_joins_non_empty_lines() {
        assert_eq!(single_line("Jl. A\n\n  RT 01 "), "Jl. A / RT 01");
        assert_eq!(single_line(""), "");
    }
}
