pub mod project;
pub mod proposal;
