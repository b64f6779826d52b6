pub mod ping_factory;
pub mod record_factory;

pub use ping_factory::PingFactory;
pub use record_factory::RecordFactory;

#[cfg(test)]
mod ping_factory_test;
#[cfg(test)]
mod record_factory_test;
