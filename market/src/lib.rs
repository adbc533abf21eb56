pub mod balance;
pub mod error;
pub mod fee;
pub mod imbalance;
pub mod types;
pub mod window;
