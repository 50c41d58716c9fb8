// Simple features of force/height curves

use crate::core::error::{ForceFileError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

pub(crate) fn check_shape(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(ForceFileError::ShapeMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    Ok(())
}

/// Position of the smallest `y`, skipping NaN. The first index wins on ties.
pub fn global_minimum(x: &[f64], y: &[f64]) -> Result<CurvePoint> {
    check_shape(x, y)?;

    let index = y
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
        .ok_or_else(|| ForceFileError::EmptyCurve("no non-NaN samples".to_string()))?;

    Ok(CurvePoint {
        x: x[index],
        y: y[index],
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_global_minimum_of_noise() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut y: Vec<f64> = (0..5000).map(|_| rng.gen_range(-1.0..1.0)).collect();
        y[892] = -3.0;
        let x: Vec<f64> = (0..5000).map(|i| i as f64).collect();

        let min = global_minimum(&x, &y).unwrap();
        assert_eq!(min.index, 892);
        assert_eq!(min.x, 892.0);
        assert_eq!(min.y, -3.0);
    }

    #[test]
    fn test_nan_ignored_and_first_tie() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [f64::NAN, 2.0, -1.0, -1.0, f64::NAN];
        let min = global_minimum(&x, &y).unwrap();
        assert_eq!(min.index, 2);
        assert_eq!(min.x, 2.0);
    }

    #[test]
    fn test_degenerate_input() {
        assert!(matches!(
            global_minimum(&[], &[]).unwrap_err(),
            ForceFileError::EmptyCurve(_)
        ));
        assert!(matches!(
            global_minimum(&[0.0, 1.0], &[f64::NAN, f64::NAN]).unwrap_err(),
            ForceFileError::EmptyCurve(_)
        ));
        assert!(matches!(
            global_minimum(&[0.0], &[1.0, 2.0]).unwrap_err(),
            ForceFileError::ShapeMismatch { x: 1, y: 2 }
        ));
    }
}
