pub mod auth;
pub mod client;
pub mod contract;
pub mod devis;
pub mod dispatch;
pub mod doc;
pub mod event;
pub mod expense;
pub mod file;
pub mod invoice;
pub mod portal;
pub mod post_it;
pub mod qonto;
pub mod shared;
pub mod signature;
pub mod stock;
pub mod task;
pub mod vendor;
