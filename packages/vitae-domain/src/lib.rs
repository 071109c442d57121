pub mod requirement;
pub mod trigram;
pub mod vector;
