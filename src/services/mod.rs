pub mod csv_reader;
pub mod query_assembler;
pub mod schema_inference;

pub use csv_reader::*;
pub use query_assembler::*;
pub use schema_inference::*;
