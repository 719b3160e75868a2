//! Zero-sized repository structs, one per aggregate.

pub mod client_repo;
pub mod quote_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use quote_repo::QuoteRepo;
pub use user_repo::UserRepo;
