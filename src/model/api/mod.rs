pub mod auth;
pub mod candidate;
pub mod election;
pub mod suggestion;
pub mod tally;
pub mod vote;
