pub mod app;
pub mod components;
pub mod export;
pub mod filter;
pub mod health;
pub mod modal;
pub mod page;
pub mod toast;
pub mod view;
