pub mod clist;
pub mod display;
pub mod error;
mod mem;
