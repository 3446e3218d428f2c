pub mod command;
pub mod context;
pub mod scheduler;
#[cfg(test)]
mod tests;
