pub mod cache;
pub mod controller;
pub mod events;

pub use cache::{CacheSnapshot, FetchTicket, QueryKey, TaskCache};
pub use controller::{BoardController, BulkArchiveReport, PendingTransition};
pub use events::BoardEvent;
