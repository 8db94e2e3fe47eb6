pub mod format;

pub use format::{CreateDrinkRequest, Deleted, DrinkList, UpdateDrinkRequest};
