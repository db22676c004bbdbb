pub mod categories;
pub mod favorites;
pub mod places;
