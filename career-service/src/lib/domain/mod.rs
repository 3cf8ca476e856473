pub mod career_path;
pub mod deadline;
pub mod errors;
pub mod user;
