mod reader;

pub use reader::read;
