pub mod html;
pub mod models;
