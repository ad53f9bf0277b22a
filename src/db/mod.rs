pub mod cats;
pub mod users;
