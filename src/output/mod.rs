// Output module
pub mod table;

pub use table::{format_number, paint, sensors_table, OutputFormat, TableOptions};
