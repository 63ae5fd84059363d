// Intake step: parse the uploaded resume and the job description (both at
// once), cache the snapshot, and hand the user a skill-gap preview before a
// session starts.

pub mod cache;
pub mod handlers;
