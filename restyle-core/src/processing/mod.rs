pub mod codec;
pub mod comparison;
pub mod frame;
