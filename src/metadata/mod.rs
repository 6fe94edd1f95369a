pub mod flatten;
pub mod path;
pub mod rehydrate;
pub mod types;

pub use flatten::*;
pub use path::*;
pub use rehydrate::*;
pub use types::*;
