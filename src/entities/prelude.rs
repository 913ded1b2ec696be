pub use super::robot::{AlertKind, Entity as Robot, Priority};
