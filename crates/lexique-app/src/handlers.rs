pub mod lookup;
pub mod pages;
pub mod words;
