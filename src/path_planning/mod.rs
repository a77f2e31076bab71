// Path Planning algorithms module

pub mod open_set;
pub mod path;
pub mod a_star;
pub mod prm;

pub use path::*;
pub use a_star::*;
pub use prm::*;
