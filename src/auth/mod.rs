mod user;

pub use user::{User, USER_ID_HEADER};
