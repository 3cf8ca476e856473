pub mod career_path;
pub mod memory;
pub mod user;

pub use career_path::PostgresCareerPathRepository;
pub use memory::InMemoryStore;
pub use user::PostgresUserRepository;
