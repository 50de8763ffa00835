pub mod chunking;
pub mod export;
pub mod extract;
pub mod inference;
