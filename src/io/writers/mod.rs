pub mod csv;
pub mod json;

pub use csv::CsvWriter;
pub use json::JsonWriter;
