pub mod users;

pub use users::AppState;
