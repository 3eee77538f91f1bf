pub mod actions;
pub mod state;
pub mod update;

pub use actions::{request_catalog, AppEvent, Services};
pub use state::App;
pub use update::{handle_key, run};
