mod budget;
mod category;
mod movement;
mod period;
mod user;

pub use budget::Budget;
pub use category::Category;
pub use movement::{Movement, MovementKind, NewMovement};
pub use period::Period;
pub use user::{normalize_email, User};

#[cfg(test)]
mod tests;
