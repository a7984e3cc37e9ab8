// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod cache;
pub mod reservations;
pub mod restaurants;
pub mod reviews;
pub mod search;
