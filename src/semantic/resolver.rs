//! Name-visibility resolution: the using tracker, the context arena it
//! owns, and the recursive visibility walk.

mod lookup;
mod using_tracker;

pub use using_tracker::UsingTracker;

#[cfg(test)]
mod tests;
