pub mod banner;
pub mod domain;
pub mod planes;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;
