use approx::assert_abs_diff_eq;
use quotient::linalg::{least_squares, Matrix, Vector};
use quotient::scalar::{Complex, Rational};

#[test]
fn scalars_flow_into_linalg() {
    let z: Complex = "3-i4".parse().expect("complex literal");
    assert_eq!(z.sqr_mag(), Rational::from(25));

    let v = Vector::new(vec![z.clone(), z.conj()]);
    assert_eq!(v.sqr_norm(), Rational::from(50));
}

#[test]
fn least_squares_line_fit() {
    let a = Matrix::from_strings(&["1 0", "1 1", "1 2", "1 3"]).expect("valid matrix literal");
    let b = Vector::from_reals([1, 3, 5, 7]);
    let x = least_squares(&a, &b).expect("independent columns");
    assert_abs_diff_eq!(x, Vector::from_reals([1, 2]), epsilon = 1e-12);
}
