pub mod index;
pub mod stream;
