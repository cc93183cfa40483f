use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "m               Toggle month labels\n",
    "+               Show one more week\n",
    "-               Show one less week\n",
    "r               Reload contributions\n",
    "c               Clear the heatmap\n",
    "?               Show this help\n",
    "q, ESC          Quit\n",
    "\n",
    "Press the Any Key to dismiss.\n",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // One blank column either side keeps the border off the heatmap
        let padded = Rect {
            x: help_area.x.saturating_sub(1),
            width: help_area.width.saturating_add(2),
            ..help_area
        };
        Clear.render(padded, buf);
        Block::new().style(self.0).render(padded, buf);
        para.render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_side_padding() {
        let style = Style::new().fg(Color::Black).bg(Color::White);
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        for cell in buf.content.iter_mut() {
            cell.set_symbol("▀").set_bg(Color::Green);
        }
        Help(style).render(area, &mut buf);
        let top = (0..area.height)
            .find(|&y| (0..area.width).any(|x| buf[(x, y)].symbol() == "┌"))
            .unwrap();
        let left = (0..area.width)
            .find(|&x| buf[(x, top)].symbol() == "┌")
            .unwrap();
        let right = (0..area.width)
            .rfind(|&x| buf[(x, top)].symbol() == "┐")
            .unwrap();
        for x in [left - 1, right + 1] {
            let cell = &buf[(x, top)];
            assert_eq!(cell.symbol(), " ");
            assert_eq!(cell.bg, Color::White);
        }
        assert_eq!(buf[(left - 2, top)].bg, Color::Green);
        assert_eq!(buf[(right + 2, top)].bg, Color::Green);
    }
}
