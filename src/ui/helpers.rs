use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use crate::models::Song;
use crate::theme::Palette;

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

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Clickable regions of the floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverlayLayout {
    /// Scrollable lyrics area.
    pub(crate) content: Rect,
    /// Bottom row holding the prev/next buttons.
    pub(crate) controls: Rect,
    /// `[x]` on the handle row.
    pub(crate) close: Rect,
    pub(crate) prev: Rect,
    pub(crate) next: Rect,
}

/// Split the panel into content, controls and buttons. The close button sits
/// where a right-aligned block title is drawn.
pub(crate) fn overlay_layout(panel: Rect) -> OverlayLayout {
    let inner = Block::default().borders(Borders::ALL).inner(panel);
    let controls_height = inner.height.min(1);
    let content = Rect {
        height: inner.height - controls_height,
        ..inner
    };
    let controls = Rect {
        y: inner.y + content.height,
        height: controls_height,
        ..inner
    };
    let button_width = 3.min(controls.width);

    OverlayLayout {
        content,
        controls,
        close: Rect::new(
            panel.right().saturating_sub(4),
            panel.y,
            3.min(panel.width),
            panel.height.min(1),
        ),
        prev: Rect {
            width: button_width,
            ..controls
        },
        next: Rect {
            x: controls.right().saturating_sub(button_width),
            width: button_width,
            ..controls
        },
    }
}

/// Render a song's sections as pairs of lines: primary text, then the
/// translation underneath in a muted style.
pub(crate) fn lyric_lines(song: &Song, palette: &Palette) -> Vec<Line<'static>> {
    if song.lyrics.is_empty() {
        return vec![Line::from(Span::styled(
            "This song has no lyrics.",
            palette.muted,
        ))];
    }

    let mut lines = Vec::with_capacity(song.line_count() * 2 + song.lyrics.len() * 2);
    for (idx, section) in song.lyrics.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.section.to_uppercase(),
            palette.accent,
        )));
        for line in &section.lines {
            lines.push(Line::from(Span::styled(
                line.en.clone(),
                palette.base.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(line.ko.clone(), palette.muted)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo_song;
    use crate::theme::Theme;

    #[test]
    fn overlay_layout_places_buttons_on_edges() {
        let layout = overlay_layout(Rect::new(10, 5, 40, 12));
        assert_eq!(layout.content, Rect::new(11, 6, 38, 9));
        assert_eq!(layout.controls, Rect::new(11, 15, 38, 1));
        assert_eq!(layout.close, Rect::new(46, 5, 3, 1));
        assert_eq!(layout.prev, Rect::new(11, 15, 3, 1));
        assert_eq!(layout.next, Rect::new(46, 15, 3, 1));
    }

    #[test]
    fn lyric_lines_interleave_translation() {
        let song = demo_song();
        let lines = lyric_lines(&song, &Theme::Dark.palette());
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(text[0], "VERSE 1");
        assert_eq!(text[1], "Twinkle, twinkle, little star");
        assert_eq!(text[2], "반짝반짝 작은 별");
        assert!(text.contains(&"CHORUS".to_string()));
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow::anyhow!("disk full").context("failed to write `lyrical_songs`");
        assert_eq!(surface_error(&err), "disk full");
    }
}
