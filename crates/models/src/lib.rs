pub mod errors;
pub mod db;
pub mod month;
pub mod service;
pub mod subscription;

#[cfg(test)]
mod tests;
