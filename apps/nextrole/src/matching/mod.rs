// Matching API: transport around the scoring core.
// Collects the job description and resumes, extracts text, runs scoring off the async runtime.

pub mod extract;
pub mod handlers;
