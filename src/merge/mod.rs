pub mod engine;
pub mod key;

pub use engine::*;
pub use key::IdentityKey;
