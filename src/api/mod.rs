pub mod dashboard;
pub mod middleware;
pub mod response;
pub mod robots;
pub mod validation;
