pub mod health;
pub mod maps;
