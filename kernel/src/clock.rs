use time::OffsetDateTime;

/*
 * Injected time source. Every date comparison in the lifecycle rules goes
 * through this trait so that services can run against a pinned "now".
 */
pub trait Clock: 'static + Sync + Send {
    fn now(&self) -> OffsetDateTime;
}

pub trait DependOnClock: 'static + Sync + Send {
    type Clock: Clock;
    fn clock(&self) -> &Self::Clock;
}
