pub mod article;
pub mod authentication;
pub mod category;
pub mod demo;
pub mod identifier;
pub mod pagination;
pub mod principal;
pub mod slug;
pub mod tag;
pub mod user;
