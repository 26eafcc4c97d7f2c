pub mod assets;
pub mod search;
pub mod system;
