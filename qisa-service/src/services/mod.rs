pub mod gateway;
pub mod prompt;
pub mod providers;
pub mod validation;

pub use gateway::ModelGateway;
pub use prompt::build_instruction;
pub use validation::validate_payload;
