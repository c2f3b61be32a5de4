pub mod battle;
pub mod map;
pub mod utils;
