pub mod mappings;
pub mod normalize;
pub mod union;
