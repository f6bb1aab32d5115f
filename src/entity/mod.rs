//! SeaORM entity definitions.

pub mod sample;
pub mod test_result;
pub mod user;
