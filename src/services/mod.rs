pub mod dashboard;
pub mod presentation;
pub mod resolver;
pub mod schema;
pub mod session;
pub mod sheets;
pub mod table;
