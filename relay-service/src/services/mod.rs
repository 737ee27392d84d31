pub mod credentials;
pub mod health;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod relay;

pub use credentials::{CredentialSource, EnvCredential};
pub use health::{HealthReport, HealthReporter};
pub use relay::{GenerationRelay, GenerationRequest, GenerationSuccess, RelayError};
