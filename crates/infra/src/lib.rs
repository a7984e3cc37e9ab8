pub mod availability;
pub mod db;
pub mod models;
pub mod pagination;
pub mod repos;
