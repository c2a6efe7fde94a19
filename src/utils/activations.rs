//! Sigmoid activation
//!
//! The network has a single activation function. The derivative is expressed
//! in terms of the sigmoid output, which is what the layers keep around.

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming x = sigmoid(z).
///
/// Returns the derivative: x * (1 - x)
pub fn sigmoid_derivative(x: f64) -> f64 {
    x * (1.0 - x)
}

/// Element-wise sigmoid, returning a new vector.
pub fn sigmoid_vec(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&v| sigmoid(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_sigmoid_zero() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_sigmoid_positive() {
        let result = sigmoid(2.0);
        assert!(result > 0.5 && result < 1.0);
    }

    #[test]
    fn test_sigmoid_negative() {
        let result = sigmoid(-2.0);
        assert!(result > 0.0 && result < 0.5);
    }

    #[test]
    fn test_sigmoid_derivative_at_half() {
        let result = sigmoid_derivative(0.5);
        assert!((result - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_vec_matches_scalar() {
        let input = [-1.0, 0.0, 3.5];
        let output = sigmoid_vec(&input);
        assert_eq!(output.len(), 3);
        for (x, y) in input.iter().zip(&output) {
            assert_eq!(sigmoid(*x), *y);
        }
    }
}
