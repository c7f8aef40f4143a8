pub mod records;
pub mod response;
