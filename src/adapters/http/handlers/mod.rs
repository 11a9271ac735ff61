pub mod draft;
pub mod history;
pub mod pages;
