mod client;
mod phone;

pub use client::{Client, ClientUpdate, NewClient};
pub use phone::Phone;
