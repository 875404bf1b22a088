pub mod canvas;
pub mod caption;
pub mod decor;
pub mod frame;
pub mod photo;
pub mod stamp;
pub mod text;
