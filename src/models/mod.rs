pub mod analysis;
pub mod query_description;

pub use analysis::*;
pub use query_description::*;
