pub mod config;
pub mod export;
pub mod models;
pub mod repository;
pub mod storage;
pub mod utils;
pub mod view;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use models::{Goal, GoalDraft, Priority, ThemeMode};
pub use repository::Repository;
pub use storage::Store;
pub use utils::Profile;
pub use view::{Filter, SortKey, Summary};
