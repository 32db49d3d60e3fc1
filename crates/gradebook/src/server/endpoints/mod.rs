pub mod gradebook;
pub mod grades;
pub mod status;
pub mod strategy;
