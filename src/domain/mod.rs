pub mod build;
pub mod package;
pub mod review;
pub mod ticket;
