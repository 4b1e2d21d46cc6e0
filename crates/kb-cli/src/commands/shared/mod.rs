pub mod parse;
pub mod visibility;
