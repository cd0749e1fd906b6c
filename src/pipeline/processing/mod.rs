// Pipeline processing: discriminant classification and normalization

pub mod normalize;
pub mod parser;
