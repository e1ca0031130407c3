pub mod models;
pub mod deck;
pub mod source;
pub mod errors;

pub use models::*;
pub use deck::*;
pub use source::*;
pub use errors::*;
