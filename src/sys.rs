pub mod bridge;
pub mod db;
pub mod fill;
