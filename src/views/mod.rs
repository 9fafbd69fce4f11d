pub mod layout;
pub mod quiz;

pub use layout::{error_page, page};
