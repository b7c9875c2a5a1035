//! Synthetic grid road network.

use rr_topology::{TopologyBuilder, TopologyGraph, TopologyResult};

/// Build a `rows × cols` grid of intersections named `r{row}c{col}`, joined
/// by two-way streets of `spacing` metres.
///
/// Each direction is its own segment, named `<from>_<to>`.  Every
/// `signal_every`-th intersection (row-major) has a traffic light; 0 means
/// none.
pub fn build_grid(
    rows:         usize,
    cols:         usize,
    spacing:      f64,
    signal_every: usize,
) -> TopologyResult<TopologyGraph> {
    let name = |r: usize, c: usize| format!("r{r}c{c}");
    let mut b = TopologyBuilder::with_capacity(rows * cols, 4 * rows * cols);

    for r in 0..rows {
        for c in 0..cols {
            let signalized = signal_every > 0 && (r * cols + c) % signal_every == 0;
            b.add_node(&name(r, c), signalized)?;
        }
    }

    for r in 0..rows {
        for c in 0..cols {
            let here = name(r, c);
            let mut neighbours = Vec::with_capacity(2);
            if c + 1 < cols {
                neighbours.push(name(r, c + 1));
            }
            if r + 1 < rows {
                neighbours.push(name(r + 1, c));
            }
            for there in neighbours {
                b.add_segment(&format!("{here}_{there}"), &here, &there, spacing)?;
                b.add_segment(&format!("{there}_{here}"), &there, &here, spacing)?;
            }
        }
    }

    Ok(b.build())
}
