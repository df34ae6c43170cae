pub mod candidates;
pub mod file;
pub mod prices;
pub mod stdin;
