use matrixcompare::assert_scalar_eq;
use nalgebra::DMatrix;
use specel::master::{BasisSettings, MasterElement, MasterElementConfig, VariableConfig};
use specel::quadrature::{NodeFamily, QuadratureError};
use specel::rules::tensor::tensor_product;
use specel::rules::univariate::gauss_lobatto;
use specel::{ConfigError, Error};

fn configured_element(num_dims: usize, num_variables: usize) -> MasterElement<f64> {
    let mut element = MasterElement::new(num_dims).unwrap();
    element.set_variable_count(num_variables).unwrap();
    element
}

#[test]
fn zero_dimensions_are_rejected() {
    assert_eq!(
        MasterElement::<f64>::new(0),
        Err(Error::InvalidConfig(ConfigError::ZeroDimensions))
    );
}

#[test]
fn variable_count_can_only_be_set_once() {
    let mut element = MasterElement::<f64>::new(1).unwrap();
    assert_eq!(element.num_variables(), 0);
    assert_eq!(
        element.set_variable_count(0),
        Err(Error::InvalidConfig(ConfigError::ZeroVariables))
    );
    element.set_variable_count(2).unwrap();
    assert_eq!(element.num_variables(), 2);
    assert_eq!(
        element.set_variable_count(3),
        Err(Error::AlreadyConfigured { num_variables: 2 })
    );
    assert_eq!(element.num_variables(), 2);
}

#[test]
fn basis_requires_variable_count() {
    let mut element = MasterElement::<f64>::new(1).unwrap();
    assert_eq!(
        element.set_basis_order(0, 3),
        Err(Error::InvalidConfig(ConfigError::VariablesNotSet))
    );
}

#[test]
fn invalid_basis_requests_are_rejected() {
    let mut element = configured_element(2, 1);
    assert_eq!(
        element.set_basis_order(0, 1),
        Err(Error::InvalidConfig(ConfigError::InvalidOrder(1)))
    );
    assert_eq!(
        element.set_basis_order(0, 0),
        Err(Error::InvalidConfig(ConfigError::InvalidOrder(0)))
    );
    assert_eq!(
        element.set_basis_order(1, 3),
        Err(Error::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        element.set_basis_order_with_tolerance(0, 3, 0.0),
        Err(Error::InvalidConfig(ConfigError::InvalidTolerance(0.0)))
    );
    assert_eq!(
        element.set_basis_orders(0, &[3], &BasisSettings::default()),
        Err(Error::InvalidConfig(ConfigError::OrderCountMismatch { expected: 2, actual: 1 }))
    );
    assert!(!element.is_basis_set(0));
    assert_eq!(element.nodes(0, 0), Err(Error::BasisNotSet { variable: 0 }));
}

#[test]
fn basis_functions_are_kronecker_delta_at_nodes() {
    let mut element = configured_element(1, 1);
    for n in 2..=9 {
        element.set_basis_order(0, n).unwrap();
        let basis = element.basis(0, 0).unwrap();
        let nodes = element.nodes(0, 0).unwrap();
        assert_eq!(basis.len(), n);
        assert_eq!(nodes.len(), n);
        for k in 0..n {
            for j in 0..n {
                let expected = if j == k { 1.0 } else { 0.0 };
                assert_scalar_eq!(basis.functions()[k].evaluate(nodes[j]), expected, comp = abs, tol = 1e-10);
            }
        }
    }
}

#[test]
fn lobatto_nodes_and_weights_are_exposed_per_dimension() {
    let mut element = configured_element(2, 1);
    element
        .set_basis_orders(0, &[4, 3], &BasisSettings::default())
        .unwrap();
    assert_eq!(element.orders(0).unwrap(), vec![4, 3]);

    let a = 1.0 / 5.0f64.sqrt();
    let nodes = element.nodes(0, 0).unwrap();
    let weights = element.weights(0, 0).unwrap();
    for (x, x_expected) in nodes.iter().zip([-1.0, -a, a, 1.0]) {
        assert_scalar_eq!(*x, x_expected, comp = abs, tol = 1e-15);
    }
    for (w, w_expected) in weights.iter().zip([1.0 / 6.0, 5.0 / 6.0, 5.0 / 6.0, 1.0 / 6.0]) {
        assert_scalar_eq!(*w, w_expected, comp = abs, tol = 1e-14);
    }
    assert_eq!(element.nodes(0, 1).unwrap(), &[-1.0, 0.0, 1.0]);
    assert_eq!(element.nodes(0, 2), Err(Error::IndexOutOfRange { index: 2, len: 2 }));
}

#[test]
fn variables_are_configured_independently() {
    let mut element = configured_element(1, 2);
    element.set_basis_order(0, 3).unwrap();
    element.set_gauss_order(1, 5).unwrap();
    let first_basis = element.basis(0, 0).unwrap().clone();

    element.set_basis_order(1, 4).unwrap();
    assert_eq!(element.basis(0, 0).unwrap(), &first_basis);
    assert_eq!(element.orders(1).unwrap(), vec![4]);

    element.set_basis_order(0, 6).unwrap();
    assert_eq!(element.orders(0).unwrap(), vec![6]);
    assert_eq!(element.orders(1).unwrap(), vec![4]);
}

#[test]
fn failed_request_keeps_previous_basis() {
    let mut element = configured_element(2, 1);
    element.set_basis_order(0, 3).unwrap();
    let previous = element.bases(0).unwrap().to_vec();

    // The first dimension could be built, the second one cannot
    let settings = BasisSettings::default().with_max_iterations(1);
    let result = element.set_basis_orders(0, &[3, 8], &settings);
    assert!(matches!(
        result,
        Err(Error::Quadrature(QuadratureError::ConvergenceFailure { order: 8, .. }))
    ));
    assert_eq!(element.bases(0).unwrap(), previous.as_slice());
}

#[test]
fn gauss_basis_uses_interior_nodes() {
    let mut element = configured_element(1, 1);
    element.set_gauss_order(0, 4).unwrap();
    let nodes = element.nodes(0, 0).unwrap();
    assert!(nodes.iter().all(|x| x.abs() < 1.0));
    assert!(nodes.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn tensor_quadrature_integrates_tensor_polynomials() {
    let mut element = configured_element(3, 1);
    element
        .set_basis_orders(0, &[3, 4, 5], &BasisSettings::default())
        .unwrap();
    let (weights, points) = element.tensor_quadrature(0).unwrap();
    assert_eq!(weights.len(), 60);
    assert_eq!(points.len(), 60);
    assert_eq!(element.num_tensor_nodes(0).unwrap(), 60);

    assert_scalar_eq!(weights.iter().sum::<f64>(), 8.0, comp = abs, tol = 1e-13);
    let integral: f64 = weights
        .iter()
        .zip(&points)
        .map(|(w, p)| w * p[0].powi(2) * p[1].powi(4) * p[2].powi(6))
        .sum();
    assert_scalar_eq!(integral, (2.0 / 3.0) * (2.0 / 5.0) * (2.0 / 7.0), comp = abs, tol = 1e-13);

    // Last dimension varies fastest
    assert_eq!(points[0].as_slice(), &[-1.0, -1.0, -1.0]);
    assert_eq!(points[1][2], element.nodes(0, 2).unwrap()[1]);
    assert_eq!(points[5][1], element.nodes(0, 1).unwrap()[1]);
}

#[test]
fn tensor_quadrature_matches_fixed_dimension_tensor_rules() {
    let mut element = configured_element(2, 1);
    element
        .set_basis_orders(0, &[3, 4], &BasisSettings::default())
        .unwrap();
    let (weights, points) = element.tensor_quadrature(0).unwrap();
    let (expected_weights, expected_points) =
        tensor_product([&gauss_lobatto(3).unwrap(), &gauss_lobatto(4).unwrap()]);
    assert_eq!(points.len(), expected_points.len());
    for (p, p_expected) in points.iter().zip(&expected_points) {
        assert_eq!(p.as_slice(), p_expected);
    }
    for (&w, &w_expected) in weights.iter().zip(&expected_weights) {
        assert_scalar_eq!(w, w_expected, comp = abs, tol = 1e-15);
    }

    let mut element = configured_element(3, 1);
    element
        .set_basis_orders(0, &[2, 3, 4], &BasisSettings::default())
        .unwrap();
    let (weights, points) = element.tensor_quadrature(0).unwrap();
    let (expected_weights, expected_points) = tensor_product([
        &gauss_lobatto(2).unwrap(),
        &gauss_lobatto(3).unwrap(),
        &gauss_lobatto(4).unwrap(),
    ]);
    assert_eq!(points.len(), expected_points.len());
    for (p, p_expected) in points.iter().zip(&expected_points) {
        assert_eq!(p.as_slice(), p_expected);
    }
    for (&w, &w_expected) in weights.iter().zip(&expected_weights) {
        assert_scalar_eq!(w, w_expected, comp = abs, tol = 1e-15);
    }
}

#[test]
fn tensor_basis_is_kronecker_delta_at_tensor_nodes() {
    let mut element = configured_element(2, 1);
    element
        .set_basis_orders(0, &[3, 4], &BasisSettings::default())
        .unwrap();
    let (_, points) = element.tensor_quadrature(0).unwrap();
    let mut values = vec![0.0; points.len()];
    for (j, point) in points.iter().enumerate() {
        element
            .populate_tensor_basis(0, &mut values, point.as_slice())
            .unwrap();
        for (k, &value) in values.iter().enumerate() {
            let expected = if j == k { 1.0 } else { 0.0 };
            assert_scalar_eq!(value, expected, comp = abs, tol = 1e-10);
        }
    }

    element.populate_tensor_basis(0, &mut values, &[0.3, -0.6]).unwrap();
    assert_scalar_eq!(values.iter().sum::<f64>(), 1.0, comp = abs, tol = 1e-10);
}

#[test]
fn tensor_basis_gradients_match_finite_differences() {
    let mut element = configured_element(2, 1);
    element
        .set_basis_orders(0, &[4, 3], &BasisSettings::default())
        .unwrap();
    let num_nodes = element.num_tensor_nodes(0).unwrap();
    let xi = [0.21, -0.43];
    let h = 1e-6;

    let mut gradients = DMatrix::zeros(2, num_nodes);
    element
        .populate_tensor_basis_gradients(0, &mut gradients, &xi)
        .unwrap();

    let mut plus = vec![0.0; num_nodes];
    let mut minus = vec![0.0; num_nodes];
    for dim in 0..2 {
        let mut xi_plus = xi;
        let mut xi_minus = xi;
        xi_plus[dim] += h;
        xi_minus[dim] -= h;
        element.populate_tensor_basis(0, &mut plus, &xi_plus).unwrap();
        element.populate_tensor_basis(0, &mut minus, &xi_minus).unwrap();
        for j in 0..num_nodes {
            let fd = (plus[j] - minus[j]) / (2.0 * h);
            assert_scalar_eq!(gradients[(dim, j)], fd, comp = abs, tol = 1e-6);
        }
    }
}

#[test]
fn master_element_from_config() {
    let config = MasterElementConfig {
        num_dims: 2,
        variables: vec![
            VariableConfig::uniform(3, 2),
            VariableConfig {
                orders: vec![2, 5],
                settings: BasisSettings::default().with_family(NodeFamily::Gauss),
            },
        ],
    };
    let element = MasterElement::<f64>::from_config(&config).unwrap();
    assert_eq!(element.num_variables(), 2);
    assert_eq!(element.orders(0).unwrap(), vec![3, 3]);
    assert_eq!(element.orders(1).unwrap(), vec![2, 5]);
    assert_eq!(element.nodes(0, 0).unwrap()[0], -1.0);
    assert!(element.nodes(1, 0).unwrap()[0] > -1.0);

    let empty = MasterElementConfig {
        num_dims: 1,
        variables: Vec::new(),
    };
    assert_eq!(
        MasterElement::<f64>::from_config(&empty),
        Err(Error::InvalidConfig(ConfigError::ZeroVariables))
    );
}

#[test]
fn config_deserializes_with_default_settings() {
    let json = r#"{
        "num_dims": 2,
        "variables": [
            { "orders": [4, 4] },
            { "orders": [3, 6], "settings": { "family": "Gauss", "tolerance": 1e-14 } }
        ]
    }"#;
    let config: MasterElementConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.variables[0].settings, BasisSettings::default());
    assert_eq!(config.variables[1].settings.family, NodeFamily::Gauss);
    assert_scalar_eq!(config.variables[1].settings.tolerance, 1e-14, comp = float);
    assert_eq!(config.variables[1].settings.max_iterations, BasisSettings::default().max_iterations);

    let element = MasterElement::<f64>::from_config(&config).unwrap();
    assert_eq!(element.orders(1).unwrap(), vec![3, 6]);

    let roundtrip: MasterElementConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(roundtrip.num_dims, config.num_dims);
    for (a, b) in roundtrip.variables.iter().zip(&config.variables) {
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.settings.family, b.settings.family);
        assert_scalar_eq!(a.settings.tolerance, b.settings.tolerance, comp = float);
    }
}

#[test]
fn configured_element_can_be_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let mut element = configured_element(2, 1);
    element.set_basis_order(0, 5).unwrap();
    assert_send_sync(&element);

    let element = &element;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|dim| scope.spawn(move || element.weights(0, dim).unwrap().iter().sum::<f64>()))
            .collect();
        for handle in handles {
            assert_scalar_eq!(handle.join().unwrap(), 2.0, comp = abs, tol = 1e-13);
        }
    });
}
