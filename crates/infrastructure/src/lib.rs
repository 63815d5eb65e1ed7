mod collection;
pub mod errors;
pub mod in_memory;
pub mod json_file;
pub mod repositories;

pub use errors::*;
pub use in_memory::*;
pub use json_file::*;
pub use repositories::*;
