pub use super::factories::{PingFactory, RecordFactory};

pub struct Factory;

impl Factory {
    pub fn record() -> RecordFactory {
        RecordFactory::new()
    }

    pub fn ping() -> PingFactory {
        PingFactory::new()
    }
}
