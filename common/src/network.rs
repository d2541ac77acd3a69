pub mod normalize;
pub mod range;
pub mod target;
