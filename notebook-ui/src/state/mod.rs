//! Client-side data

pub mod sets;
