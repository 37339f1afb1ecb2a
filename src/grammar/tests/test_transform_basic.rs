use crate::geom::{Point3, Tolerance, Transform, Vec3};
use crate::grammar::{GrammarError, TransformOp, parse_transform, transform::parse_ops};

fn tol() -> Tolerance {
    Tolerance::new(1e-12)
}

#[test]
fn empty_spec_is_identity() {
    assert_eq!(parse_transform("").unwrap(), Transform::identity());
    assert_eq!(parse_transform("  \n\t ").unwrap(), Transform::identity());
}

#[test]
fn translation_forms_agree() {
    let split = parse_transform("tx 1 ty 2 tz 3").unwrap();
    let joined = parse_transform("t 1 2 3").unwrap();
    let expected = Transform::translate(Vec3::new(1.0, 2.0, 3.0));
    assert!(tol().approx_eq_transform(split, expected));
    assert!(tol().approx_eq_transform(joined, expected));
}

#[test]
fn scale_forms_agree() {
    let uniform = parse_transform("sa 2").unwrap();
    let explicit = parse_transform("s 2 2 2").unwrap();
    let per_axis = parse_transform("sx 2 sy 2 sz 2").unwrap();
    assert!(tol().approx_eq_transform(uniform, explicit));
    assert!(tol().approx_eq_transform(uniform, per_axis));
}

#[test]
fn rotations_are_in_degrees() {
    let rz = parse_transform("rz 90").unwrap();
    assert!(Tolerance::new(1e-9).approx_eq_point3(rz * Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)));

    let ops = parse_ops("rx 45 ry -30").unwrap();
    assert_eq!(ops, vec![TransformOp::RotateX(45.0), TransformOp::RotateY(-30.0)]);
}

#[test]
fn operators_compose_by_right_multiplication() {
    // The last operator is applied to the point first.
    let translate_then_scale = parse_transform("tx 1 sa 2").unwrap();
    assert_eq!(translate_then_scale * Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));

    let scale_then_translate = parse_transform("sa 2 tx 1").unwrap();
    assert_eq!(scale_then_translate * Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
}

#[test]
fn unknown_token_reports_position() {
    let err = parse_transform("tx 1 qq 2").unwrap_err();
    match err {
        GrammarError::InvalidTransformToken { token, position, spec } => {
            assert_eq!(token, "qq");
            assert_eq!(position, 2);
            assert_eq!(spec, "tx 1 qq 2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn operand_errors() {
    assert!(matches!(
        parse_transform("ty 1 tx"),
        Err(GrammarError::MissingOperand { ref token, .. }) if token == "tx"
    ));
    assert!(matches!(
        parse_transform("s 1 2"),
        Err(GrammarError::MissingOperand { ref token, .. }) if token == "s"
    ));
    assert!(matches!(
        parse_transform("ty abc"),
        Err(GrammarError::InvalidOperand { ref value, .. }) if value == "abc"
    ));
}
