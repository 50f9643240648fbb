//! Data models for the roll call application.
//!
//! Wire field names match the original frontend contract (snake_case).

mod group;
mod group_student;
mod roll;
mod student;

pub use group::*;
pub use group_student::*;
pub use roll::*;
pub use student::*;
