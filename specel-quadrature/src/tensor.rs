//! 2D and 3D quadrature rules formed by tensor product formulations.
//!
//! For quadrilaterals and hexahedra, quadrature rules can be constructed as tensor products
//! of 1D rules. Points are ordered so that the last coordinate varies fastest.

use crate::univariate::{gauss, gauss_lobatto};
use crate::{Error, Rule};

/// Forms the tensor product of one 1D rule per dimension.
///
/// The rules may have different numbers of points. The resulting rule has as many points as the
/// product of the sizes of the 1D rules.
pub fn tensor_product<const D: usize>(rules: [&Rule<1>; D]) -> Rule<D> {
    let num_points: usize = rules.iter().map(|(weights, _)| weights.len()).product();
    let mut weights = Vec::with_capacity(num_points);
    let mut points = Vec::with_capacity(num_points);
    weights.push(1.0);
    points.push([0.0; D]);

    for (dim, (weights1d, points1d)) in rules.iter().enumerate() {
        let mut next_weights = Vec::with_capacity(weights.len() * weights1d.len());
        let mut next_points = Vec::with_capacity(points.len() * points1d.len());
        for (w, p) in weights.iter().zip(&points) {
            for (w1d, &[x]) in weights1d.iter().zip(points1d) {
                let mut point = *p;
                point[dim] = x;
                next_weights.push(w * w1d);
                next_points.push(point);
            }
        }
        weights = next_weights;
        points = next_points;
    }

    (weights, points)
}

/// A Gauss quadrature rule for the reference quadrilateral.
///
/// The rule is constructed as a tensor product from 1D rules, with the provided number of
/// points per dimension.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    let rule1d = gauss(num_points_per_dim)?;
    Ok(tensor_product([&rule1d, &rule1d]))
}

/// A Gauss quadrature rule for the reference hexahedron.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    let rule1d = gauss(num_points_per_dim)?;
    Ok(tensor_product([&rule1d, &rule1d, &rule1d]))
}

/// A Gauss-Lobatto quadrature rule for the reference quadrilateral.
pub fn quadrilateral_gauss_lobatto(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    let rule1d = gauss_lobatto(num_points_per_dim)?;
    Ok(tensor_product([&rule1d, &rule1d]))
}

/// A Gauss-Lobatto quadrature rule for the reference hexahedron.
pub fn hexahedron_gauss_lobatto(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    let rule1d = gauss_lobatto(num_points_per_dim)?;
    Ok(tensor_product([&rule1d, &rule1d, &rule1d]))
}
