//! # TUI Components
//!
//! ### Stateless (props only)
//!
//! - `TitleBar`: gateway name, status, unseen-content hint
//! - `Message` / `TypingIndicator`: one transcript entry, or the placeholder
//!
//! ### Stateful
//!
//! - `InputBox`: prompt editor; owns its buffer, `locked` is a prop
//! - `MessageList`: scrollable transcript with a height cache; state lives
//!   in `MessageListState` so it survives between frames
//!
//! Components receive data as props set by the parent before each frame,
//! never by reaching into `App`:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(name, app.status_message.clone(), unseen);
//! title_bar.render(frame, area);
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
