pub mod digest;
pub mod document;
