mod token;

pub use token::{Claims, TokenDecoder};
