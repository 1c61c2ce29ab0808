pub mod applicant;
pub mod assessment;
pub mod job;
pub mod score;
