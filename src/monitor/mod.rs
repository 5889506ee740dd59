pub mod mutation;
pub mod poll;
pub mod source;
pub mod watcher;

pub use mutation::{MutationFeed, MutationSender};
pub use poll::UrlPoller;
pub use source::{ChangeBatch, ChangeSource};
pub use watcher::{ChangeMonitor, MonitorAction};
