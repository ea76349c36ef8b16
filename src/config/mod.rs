pub mod error;
pub mod loader;
pub mod mqtt_config;
pub mod provider;
pub mod resolver;
pub mod trigger;

pub trait ConfigResolver {
    type Output;
    type Error;

    fn resolve(self) -> Result<Self::Output, Self::Error>;
}
