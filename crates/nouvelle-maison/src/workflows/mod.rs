pub mod attachment;
pub mod interaction;
pub mod listing;
pub mod navigation;
pub mod notaries;
pub mod rent;
pub mod search;
pub mod session;
