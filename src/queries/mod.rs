//! Query functions, one per scenario. Every function runs on the caller's
//! session and neither commits nor swallows errors.

pub mod analytics;
pub mod resumes;
pub mod vacancies;
pub mod workers;
