pub mod error;
pub mod experience;
pub mod outcome;

#[cfg(test)]
mod tests;
