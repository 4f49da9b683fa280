pub mod model;
pub mod service;
pub mod store;

pub use model::{AwsCredentials, AzureCredentials, Credentials, GcpCredentials, Profile, Provider, TokenStorage};
pub use service::ProfileService;
