pub mod accounts;
pub mod comments;
pub mod history;
pub mod pages;
pub mod search;
