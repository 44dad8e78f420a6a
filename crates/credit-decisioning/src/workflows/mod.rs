pub mod batch;
pub mod credit;
