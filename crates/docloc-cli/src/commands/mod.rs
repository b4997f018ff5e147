pub mod check;
pub mod extract;
pub mod generate;
pub mod schema;
pub mod update;
