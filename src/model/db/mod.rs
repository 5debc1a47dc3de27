pub mod candidate;
pub mod election;
pub mod profile;
pub mod suggestion;
pub mod vote;
