pub mod html;
pub mod test_utils;
pub mod timestamp;
