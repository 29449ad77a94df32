use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use task_board_core::PriorityFilter;
use task_board_store::KeyValueStore;

use super::super::view::{Message, Mode, Ui};

impl<S: KeyValueStore> Ui<S> {
    pub(in crate::tui) fn draw_filter_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let state = self.board.state();
        let searching = self.mode == Mode::Search;
        let query = state.search_query();

        let mut spans = vec![Span::styled("Search: ", Style::default().fg(Color::DarkGray))];
        if query.is_empty() && !searching {
            spans.push(Span::styled("(none)", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::raw(query));
        }
        if searching {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        spans.push(Span::styled("   Priority: ", Style::default().fg(Color::DarkGray)));
        let priority = state.filter_priority();
        let priority_style = if priority == PriorityFilter::All {
            Style::default()
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(priority.as_str(), priority_style));
        let view = self.board.view();
        spans.push(Span::styled(
            format!("   {}/{} shown", view.total(), state.tasks().len()),
            Style::default().fg(Color::DarkGray),
        ));

        let border_style = if searching {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(" Filter ")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(bar, area);
    }

    pub(in crate::tui) fn draw_help(&self, f: &mut Frame<'_>, area: Rect) {
        let help = Paragraph::new(self.instructions())
            .block(Block::default().title(" Keys ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(help, area);
    }

    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let message = Paragraph::new(self.status_text())
            .block(Block::default().title(" Status ").borders(Borders::ALL))
            .style(self.status_style());
        f.render_widget(message, area);
    }

    pub(in crate::tui) const fn instructions(&self) -> &'static str {
        match self.mode {
            Mode::Browse => {
                "h/l column  j/k select  n new  e edit  c done  d delete  m move  / search  p priority  x clear done  q quit"
            }
            Mode::Search => "type to filter  Backspace delete  Ctrl-U clear  Enter/Esc done",
            Mode::KeyboardDrag(_) => "h/l change column  j/k reorder  Enter/Esc drop",
            Mode::PointerDrag(_) => "drag over a column or card, release to drop  Esc cancel",
        }
    }

    fn status_text(&self) -> Cow<'_, str> {
        self.message
            .as_ref()
            .map_or(Cow::Borrowed(""), |msg| Cow::Borrowed(msg.text.as_str()))
    }

    fn status_style(&self) -> Style {
        self.message.as_ref().map_or_else(Style::default, Message::style)
    }
}
