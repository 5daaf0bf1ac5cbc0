pub mod thought;
pub mod user;

pub use thought::{Thought, ThoughtCreate, ThoughtStatus, ThoughtUpdate};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
