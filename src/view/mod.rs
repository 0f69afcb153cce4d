pub mod commands;
pub mod events;
pub mod list_view;


pub use commands::Command;
pub use events::Message;
pub use list_view::ListView;
