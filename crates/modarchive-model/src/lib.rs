pub mod track;
pub mod search_type;
pub mod file_name;

pub use track::*;
pub use search_type::*;
pub use file_name::*;
