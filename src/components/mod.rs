pub mod status_bar;
pub mod tree;
