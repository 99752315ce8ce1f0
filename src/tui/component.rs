use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a `Rect`.
///
/// Props are struct fields set by the parent before each frame. `render`
/// takes `&mut self` so stateful components can refresh caches (heights,
/// scroll offsets) during the draw pass, like Ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns low-level `TuiEvent`s into its own events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
