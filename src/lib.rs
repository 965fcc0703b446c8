//! Numerical core for spectral element methods.
//!
//! The crate provides the reference ("master") element building blocks of a spectral element
//! discretization:
//!
//! - Legendre-Gauss-Lobatto and Gauss-Legendre quadrature rules, see [`quadrature`],
//! - monomial polynomial interpolants fitted through point sets, see [`polynomial`],
//! - nodal Lagrange bases on quadrature nodes, see [`basis`],
//! - a [`MasterElement`](master::MasterElement) holding one basis per variable and per dimension.
//!
//! The `f64` Legendre polynomials and raw quadrature rules live in the dependency-free
//! `specel-quadrature` crate, which is re-exported here as [`rules`].
use nalgebra::RealField;

pub mod basis;
pub mod error;
pub mod master;
pub mod polynomial;
pub mod quadrature;

pub mod rules {
    pub use specel_quadrature::*;
}

pub use error::{ConfigError, Error, Result};

pub extern crate nalgebra;

/// Scalar types supported by the crate.
///
/// Used as a trait alias for the traits needed by the generic `specel` routines.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
