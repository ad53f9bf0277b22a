pub mod cat;
pub mod user;

pub use cat::{Cat, CatInput, OwnerSnapshot};
pub use user::{normalize_email, NewUser, Role, User, UserOutput, UserUpdate};
