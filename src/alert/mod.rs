pub mod core;
pub mod run_effect;
#[cfg(test)]
mod tests;
pub mod visual_interrupt;
