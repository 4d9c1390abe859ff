pub mod bbox;
pub mod project;
pub mod zoom;
