mod category;

pub use category::{Category, CategoryField, NewCategory};
