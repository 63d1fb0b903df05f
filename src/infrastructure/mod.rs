pub mod ml;
pub mod security;
pub mod storage;
