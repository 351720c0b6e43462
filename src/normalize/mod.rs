pub mod date;
pub mod doi;
pub mod text;

pub use date::*;
pub use doi::*;
pub use text::normalize_text;
