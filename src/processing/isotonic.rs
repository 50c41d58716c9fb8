// Non-decreasing least-squares fit (pool adjacent violators)

use crate::core::error::{ForceFileError, Result};
use crate::processing::curve_features::check_shape;

struct Block {
    sum: f64,
    weight: f64,
    // number of distinct-x groups pooled into this block
    groups: usize,
}

impl Block {
    fn mean(&self) -> f64 {
        self.sum / self.weight
    }
}

/// Fits `y` against `x` and returns the fit at every input position.
/// Samples sharing an `x` are pooled to their mean first.
pub fn isotonic_fit(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    check_shape(x, y)?;
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(ForceFileError::InputType(
            "curve contains non-finite values".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    // (first position in `order`, sum, count) per distinct x
    let mut groups: Vec<(usize, f64, f64)> = Vec::new();
    for (pos, &i) in order.iter().enumerate() {
        let tied = groups
            .last()
            .is_some_and(|&(start, _, _)| x[order[start]] == x[i]);
        if !tied {
            groups.push((pos, 0.0, 0.0));
        }
        if let Some((_, sum, count)) = groups.last_mut() {
            *sum += y[i];
            *count += 1.0;
        }
    }

    let mut blocks: Vec<Block> = Vec::with_capacity(groups.len());
    for &(_, sum, count) in &groups {
        blocks.push(Block {
            sum,
            weight: count,
            groups: 1,
        });
        while blocks.len() > 1 {
            let last = blocks.len() - 1;
            if blocks[last - 1].mean() <= blocks[last].mean() {
                break;
            }
            if let Some(tail) = blocks.pop() {
                let head = &mut blocks[last - 1];
                head.sum += tail.sum;
                head.weight += tail.weight;
                head.groups += tail.groups;
            }
        }
    }

    let mut fitted = vec![0.0; x.len()];
    let mut group = 0;
    for block in &blocks {
        let value = block.mean();
        for _ in 0..block.groups {
            let start = groups[group].0;
            let end = groups.get(group + 1).map_or(order.len(), |g| g.0);
            for &i in &order[start..end] {
                fitted[i] = value;
            }
            group += 1;
        }
    }

    Ok(fitted)
}
