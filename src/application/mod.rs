//! Application services layer: the store contract and the store-backed service.

pub mod error;
pub mod pagination;
pub mod repos;
pub mod translations;
