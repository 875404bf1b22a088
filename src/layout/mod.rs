pub mod decor;
pub mod fit;
