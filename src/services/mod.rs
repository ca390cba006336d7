// Service exports
pub mod gateway;

pub use gateway::{
    Completion, CompletionModels, GatewayError, ProviderError, ProviderFailure, ProviderGateway,
};
