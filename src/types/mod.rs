pub mod payload;
pub mod replay;
pub mod track;
