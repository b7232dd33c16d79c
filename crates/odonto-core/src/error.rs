//! Error types for `odonto-core`.

use thiserror::Error;

use crate::note::ToothNumber;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is not a permanent tooth in FDI notation")]
  InvalidToothNumber(ToothNumber),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
