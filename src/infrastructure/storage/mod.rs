pub mod temp_file_store;
pub mod traits;
