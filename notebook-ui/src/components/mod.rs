//! UI Components

pub mod nav;
pub mod set_list;

pub use nav::Nav;
pub use set_list::SetList;
