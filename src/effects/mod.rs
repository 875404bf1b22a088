pub mod composite;
pub mod grain;
pub mod shadow;
pub mod tone;
