pub mod greeting_service;
pub mod rate_resolver;
pub mod token_resolver;

pub use greeting_service::GreetingService;
pub use rate_resolver::RateResolver;
pub use token_resolver::TokenResolver;
