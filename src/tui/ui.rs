use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

const EMPTY_HINT: &str = "Ask quill anything. Replies are typed out as they arrive.";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.gateway.name().to_string(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    );
    title_bar.render(frame, title_area);

    if app.transcript.is_empty() && !app.transcript.has_placeholder() {
        draw_empty_state(frame, main_area);
    } else {
        MessageList::new(&mut tui.message_list, &app.transcript, spinner_frame)
            .render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);
}

fn draw_empty_state(frame: &mut Frame, area: Rect) {
    let [_, hint_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let hint = Paragraph::new(EMPTY_HINT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
    frame.render_widget(hint, hint_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_transcript_shows_hint() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("Ask quill anything"));
        assert!(text.contains("Quill (backend: stub)"));
    }

    #[test]
    fn test_conversation_replaces_hint() {
        let mut app = test_app();
        app.transcript.append_user_message("What is Rust?");
        app.transcript.show_placeholder();
        let mut tui = TuiState::new();

        let text = screen(&app, &mut tui);
        assert!(!text.contains("Ask quill anything"));
        assert!(text.contains("What is Rust?"));
    }
}
