pub mod actions;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod derive;
pub mod error;
pub mod i18n;
pub mod icon;
pub mod persistence;
pub mod reducer;
pub mod state;
pub mod store;
pub mod task_id;

pub use actions::*;
pub use reducer::*;
pub use state::*;

pub use store::*;
