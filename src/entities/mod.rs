pub mod robot;

pub use robot::Entity as Robot;

pub mod prelude;
