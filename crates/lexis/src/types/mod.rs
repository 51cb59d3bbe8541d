mod language;
mod value;

pub use language::{Direction, Language};
pub use value::Value;
