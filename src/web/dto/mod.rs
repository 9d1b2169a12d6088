pub mod account;
pub mod certificates;
pub mod courses;
pub mod quiz;
