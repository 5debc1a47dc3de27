mod election;
mod post;
mod role;

pub use election::ElectionStatus;
pub use post::Post;
pub use role::Role;
