pub mod cats;
pub mod users;

pub use cats::CatService;
pub use users::UserService;
