pub mod local;
pub mod printer;
