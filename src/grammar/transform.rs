//! The transform mini-language used by `call` and `instance` statements.
//!
//! A transform string such as `"ty 0.4 rx 1 sa 0.995"` is a whitespace separated stream
//! of operators, each followed by one or three numbers. Operators compose
//! left to right by right-multiplication, so the last operator is the first
//! one applied to a point. Rotations are given in degrees.

use crate::geom::{Transform, Vec3};

use super::GrammarError;

/// One parsed operator of a transform string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate(Vec3),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Scale(Vec3),
}

impl TransformOp {
    /// Matrix for this operator. Rotation angles are in degrees.
    #[must_use]
    pub fn to_transform(self) -> Transform {
        match self {
            TransformOp::Translate(offset) => Transform::translate(offset),
            TransformOp::RotateX(degrees) => Transform::rotate_x(degrees.to_radians()),
            TransformOp::RotateY(degrees) => Transform::rotate_y(degrees.to_radians()),
            TransformOp::RotateZ(degrees) => Transform::rotate_z(degrees.to_radians()),
            TransformOp::Scale(factors) => Transform::scale(factors.x, factors.y, factors.z),
        }
    }
}

#[derive(Clone, Copy)]
enum Operator {
    Tx,
    Ty,
    Tz,
    T,
    Rx,
    Ry,
    Rz,
    Sx,
    Sy,
    Sz,
    Sa,
    S,
}

impl Operator {
    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "tx" => Self::Tx,
            "ty" => Self::Ty,
            "tz" => Self::Tz,
            "t" => Self::T,
            "rx" => Self::Rx,
            "ry" => Self::Ry,
            "rz" => Self::Rz,
            "sx" => Self::Sx,
            "sy" => Self::Sy,
            "sz" => Self::Sz,
            "sa" => Self::Sa,
            "s" => Self::S,
            _ => return None,
        })
    }

    const fn arity(self) -> usize {
        match self {
            Self::T | Self::S => 3,
            _ => 1,
        }
    }

    fn build(self, v: &[f64]) -> TransformOp {
        match self {
            Self::Tx => TransformOp::Translate(Vec3::new(v[0], 0.0, 0.0)),
            Self::Ty => TransformOp::Translate(Vec3::new(0.0, v[0], 0.0)),
            Self::Tz => TransformOp::Translate(Vec3::new(0.0, 0.0, v[0])),
            Self::T => TransformOp::Translate(Vec3::new(v[0], v[1], v[2])),
            Self::Rx => TransformOp::RotateX(v[0]),
            Self::Ry => TransformOp::RotateY(v[0]),
            Self::Rz => TransformOp::RotateZ(v[0]),
            Self::Sx => TransformOp::Scale(Vec3::new(v[0], 1.0, 1.0)),
            Self::Sy => TransformOp::Scale(Vec3::new(1.0, v[0], 1.0)),
            Self::Sz => TransformOp::Scale(Vec3::new(1.0, 1.0, v[0])),
            Self::Sa => TransformOp::Scale(Vec3::splat(v[0])),
            Self::S => TransformOp::Scale(Vec3::new(v[0], v[1], v[2])),
        }
    }
}

/// Tokenize `spec` into operators.
///
/// `position` in [`GrammarError::InvalidTransformToken`] is the zero-based
/// token index of the offending operator.
pub fn parse_ops(spec: &str) -> Result<Vec<TransformOp>, GrammarError> {
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    let mut ops = Vec::new();
    let mut t = 0;

    while t < tokens.len() {
        let token = tokens[t];
        let op = Operator::from_token(token).ok_or_else(|| GrammarError::InvalidTransformToken {
            token: token.to_owned(),
            position: t,
            spec: spec.to_owned(),
        })?;
        t += 1;

        let mut operands = [0.0; 3];
        for slot in operands.iter_mut().take(op.arity()) {
            let raw = tokens.get(t).ok_or_else(|| GrammarError::MissingOperand {
                token: token.to_owned(),
                spec: spec.to_owned(),
            })?;
            *slot = raw.parse().map_err(|_| GrammarError::InvalidOperand {
                token: token.to_owned(),
                value: (*raw).to_owned(),
                spec: spec.to_owned(),
            })?;
            t += 1;
        }
        ops.push(op.build(&operands));
    }

    Ok(ops)
}

/// Parse `spec` and fold its operators into one matrix.
///
/// An empty string is the identity.
pub fn parse_transform(spec: &str) -> Result<Transform, GrammarError> {
    let ops = parse_ops(spec)?;
    Ok(ops
        .into_iter()
        .fold(Transform::identity(), |acc, op| acc * op.to_transform()))
}
