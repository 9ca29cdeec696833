pub mod table;

pub use table::{IngestError, RawTable, read_table};
