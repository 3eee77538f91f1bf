pub mod logging;
pub mod text;

pub use text::{human_size, truncate_with_ellipsis};
