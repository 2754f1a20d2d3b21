pub mod domain;
pub mod generation;
pub mod ports;
pub mod prompts;

pub use domain::{ContentKind, GenerationRequest, GenerationResult, User, UserCredentials};
pub use generation::{generate_content, GenerateError};
pub use ports::{ContentGenerationService, DatabaseService, GenerationError, PortError, PortResult};
