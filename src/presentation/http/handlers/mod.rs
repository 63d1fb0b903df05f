pub mod faces;
pub mod health;
