//! Loader for the bicubic patch subset of RenderMan RIB.
//!
//! Recognized directives:
//!
//! ```text
//! TransformBegin
//! TransformEnd
//! Translate x y z
//! Scale x y z
//! Rotate degrees ax ay az
//! Patch "bicubic" "P" [x0 y0 z0 ... x15 y15 z15]
//! ```
//!
//! A patch's 48 values may continue over the following lines. Transforms
//! accumulate by right-multiplication and are scoped by Begin/End blocks.
//! Every other directive, and lines starting with `#`, are skipped.

use regex::Regex;
use thiserror::Error;

use crate::geom::{BicubicPatch, PATCH_CONTROL_POINTS, Point3, Transform, Vec3};

const PATCH_VALUES: usize = PATCH_CONTROL_POINTS * 3;
const TOKEN_SEPARATORS: &str = r"[\s\[\]]+";

pub type RibResult<T> = Result<T, RibError>;

/// Errors raised while loading patches. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum RibError {
    #[error("line {line}: unsupported patch basis `{basis}`, only `bicubic` is understood")]
    UnsupportedBasis { line: usize, basis: String },
    #[error("line {line}: input ended after {collected} of 48 patch values")]
    UnexpectedEndOfInput { line: usize, collected: usize },
    #[error("line {line}: patch has {count} values, expected 48")]
    TooManyValues { line: usize, count: usize },
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: {directive} takes {expected} arguments, found {found}")]
    WrongArity {
        line: usize,
        directive: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: rotation axis has zero length")]
    DegenerateAxis { line: usize },
    #[error("line {line}: TransformEnd without matching TransformBegin")]
    UnbalancedTransformEnd { line: usize },
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Current transform plus the values saved by enclosing `TransformBegin`s.
#[derive(Debug, Default)]
struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    fn begin(&mut self) {
        self.saved.push(self.current);
    }

    fn end(&mut self, line: usize) -> RibResult<()> {
        self.current = self
            .saved
            .pop()
            .ok_or(RibError::UnbalancedTransformEnd { line })?;
        Ok(())
    }

    fn apply(&mut self, transform: Transform) {
        self.current *= transform;
    }

    fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Parse every patch in `input`.
///
/// Any error discards the patches parsed so far.
pub fn parse_str(input: &str) -> RibResult<Vec<BicubicPatch>> {
    let splitter = Regex::new(TOKEN_SEPARATORS)?;
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text));
    let mut stack = TransformStack::default();
    let mut patches = Vec::new();

    while let Some((line, text)) = lines.next() {
        let tokens = tokenize(&splitter, text);
        let Some((&directive, args)) = tokens.split_first() else {
            continue;
        };
        if directive.starts_with('#') {
            continue;
        }

        match directive {
            "TransformBegin" => stack.begin(),
            "TransformEnd" => stack.end(line)?,
            "Translate" => {
                let [x, y, z] = numbers::<3>(line, "Translate", args)?;
                stack.apply(Transform::translate(Vec3::new(x, y, z)));
            }
            "Scale" => {
                let [x, y, z] = numbers::<3>(line, "Scale", args)?;
                stack.apply(Transform::scale(x, y, z));
            }
            "Rotate" => {
                let [degrees, ax, ay, az] = numbers::<4>(line, "Rotate", args)?;
                let rotation = Transform::rotate_axis(Vec3::new(ax, ay, az), degrees.to_radians())
                    .ok_or(RibError::DegenerateAxis { line })?;
                stack.apply(rotation);
            }
            "Patch" => {
                let points = patch_points(&splitter, line, args, &mut lines)?;
                patches.push(BicubicPatch::new(&points, stack.current));
            }
            other => log::debug!("line {line}: skipping RIB directive `{other}`"),
        }
    }

    if stack.depth() > 0 {
        log::warn!("{} TransformBegin block(s) left open at end of input", stack.depth());
    }
    log::debug!("parsed {} bicubic patches", patches.len());
    Ok(patches)
}

fn tokenize<'a>(splitter: &Regex, text: &'a str) -> Vec<&'a str> {
    splitter.split(text.trim()).filter(|t| !t.is_empty()).collect()
}

fn number(line: usize, token: &str) -> RibResult<f64> {
    token.parse().map_err(|_| RibError::InvalidNumber {
        line,
        token: token.to_owned(),
    })
}

fn numbers<const N: usize>(line: usize, directive: &'static str, args: &[&str]) -> RibResult<[f64; N]> {
    if args.len() != N {
        return Err(RibError::WrongArity {
            line,
            directive,
            expected: N,
            found: args.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = number(line, token)?;
    }
    Ok(out)
}

fn patch_points<'a, I>(
    splitter: &Regex,
    line: usize,
    args: &[&str],
    lines: &mut I,
) -> RibResult<[Point3; PATCH_CONTROL_POINTS]>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let basis = args.first().map_or("", |b| b.trim_matches('"'));
    if basis != "bicubic" {
        return Err(RibError::UnsupportedBasis {
            line,
            basis: basis.to_owned(),
        });
    }

    // Skip the basis and the "P" parameter name.
    let mut values = Vec::with_capacity(PATCH_VALUES);
    for token in args.iter().skip(2) {
        values.push(number(line, token)?);
    }
    while values.len() < PATCH_VALUES {
        let (next_line, text) = lines.next().ok_or(RibError::UnexpectedEndOfInput {
            line,
            collected: values.len(),
        })?;
        for token in tokenize(splitter, text) {
            values.push(number(next_line, token)?);
        }
    }
    if values.len() > PATCH_VALUES {
        return Err(RibError::TooManyValues {
            line,
            count: values.len(),
        });
    }

    let mut points = [Point3::ORIGIN; PATCH_CONTROL_POINTS];
    for (point, xyz) in points.iter_mut().zip(values.chunks_exact(3)) {
        *point = Point3::new(xyz[0], xyz[1], xyz[2]);
    }
    Ok(points)
}
