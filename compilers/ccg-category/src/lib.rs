pub mod category;
pub mod error;
pub mod parser;

pub use category::{Atom, Category, Slash};
pub use error::CategoryError;
