pub mod export;
pub mod geo;
pub mod opponent;
pub mod parse;
pub mod pauses;
pub mod process;
pub mod profile;
pub mod sanitize;
