pub mod review;
pub mod root;
