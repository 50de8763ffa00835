pub mod classify;
pub mod digest;
pub mod documents;
pub mod export;
pub mod health;
