#[cfg(test)]
pub mod impl_fake;
pub mod impl_interval;
pub mod interface;
