//! Weighted part selection and connectivity construction.
//!
//! The builder runs three phases over one [`Diagram`]:
//!
//! 1. **Selection**: a fixed source part, then N roulette-weighted picks
//!    (category first, then a weighted template within the category), then
//!    exactly one ground part appended outside ring membership.
//! 2. **Grounding (actives)**: every part declaring three or more pins has
//!    its table-designated pin wired to the ground part's first pin.
//! 3. **Ring**: the non-ground instances are walked in append order and
//!    chained output-pin to input-pin, then closed back to the head.
//!    Diode-family parts get an extra first-pin ground tap afterwards.
//!
//! Ground wires ignore the pin availability check; ring wires require an
//! unused pin and abort the document when none is left.

pub mod family;

use rand::Rng;
use tracing::debug;

use crate::catalog::library::PinRole;
use crate::catalog::selector::CatalogSelector;
use crate::catalog::weights::WeightTable;
use crate::diagram::model::{Diagram, PinRef};

/// Category weights used by the selection roulette, in draw order.
pub const CATEGORY_WEIGHTS: &[(&str, f64)] = &[
    ("R", 0.48),
    ("L", 0.03),
    ("C", 0.26),
    ("D", 0.16),
    ("Q", 0.07),
];

/// Error type for topology construction. All variants abandon the current
/// document; none of them leaves a partially wired circuit behind.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A weighted pick (or the configured source/ground part) names a
    /// template no catalog carries. Indicates the weight table and the
    /// catalogs disagree.
    #[error("template '{0}' is missing from every imported catalog")]
    SelectionMiss(String),
    /// The weight table has no candidates for a drawn category.
    #[error("category '{0}' has no weighted candidates")]
    EmptyCategory(String),
    /// Ring construction ran out of unused pins.
    #[error("no unused pin left on '{reference}' while wiring the loop")]
    Infeasible { reference: String },
    /// The ground part declares no pins to tap.
    #[error("ground part '{0}' declares no pins")]
    GroundUnusable(String),
}

/// Drives selection, grounding, and ring construction for one run.
pub struct TopologyBuilder<'a, 'c> {
    selector: CatalogSelector<'c>,
    weights: &'a WeightTable,
}

impl<'a, 'c> TopologyBuilder<'a, 'c> {
    pub fn new(selector: CatalogSelector<'c>, weights: &'a WeightTable) -> Self {
        Self { selector, weights }
    }

    /// Select `part_count` weighted parts plus the source and ground parts,
    /// and wire them into a closed loop with grounding taps.
    pub fn build<R: Rng>(
        mut self,
        part_count: usize,
        source_name: &str,
        ground_name: &str,
        rng: &mut R,
    ) -> Result<Diagram, TopologyError> {
        let mut diagram = Diagram::new();

        // Selection: source first, weighted mix, ground last.
        let source = self
            .selector
            .select(source_name, true)
            .ok_or_else(|| TopologyError::SelectionMiss(source_name.to_string()))?;
        diagram.add_instance(source, rng);

        for _ in 0..part_count {
            let category = CATEGORY_WEIGHTS[roulette_draw(CATEGORY_WEIGHTS, rng)].0;
            let name = self.draw_candidate(category, rng)?;
            debug!(category, template = %name, "selected part");
            let pick = self
                .selector
                .select(&name, true)
                .ok_or(TopologyError::SelectionMiss(name))?;
            diagram.add_instance(pick, rng);
        }

        let ground_pick = self
            .selector
            .select(ground_name, true)
            .ok_or_else(|| TopologyError::SelectionMiss(ground_name.to_string()))?;
        let ground = diagram.add_instance(ground_pick, rng);
        diagram.set_ground(ground);
        if diagram.instances[ground].pins.is_empty() {
            return Err(TopologyError::GroundUnusable(ground_name.to_string()));
        }
        let ground_pin = PinRef {
            instance: ground,
            pin: 0,
        };

        // Three-terminal actives are tapped to ground before the ring walk,
        // so the ring never claims the grounded pin.
        ground_actives(&mut diagram, ground_pin, rng);

        connect_ring(&mut diagram, rng)?;

        // Diode-family parts keep their first pin tied to ground even when
        // the ring already uses it.
        ground_diodes(&mut diagram, ground_pin, rng);

        Ok(diagram)
    }

    /// Weighted intra-category pick from the weight table.
    fn draw_candidate<R: Rng>(
        &self,
        category: &str,
        rng: &mut R,
    ) -> Result<String, TopologyError> {
        let candidates = self.weights.candidates(category);
        if candidates.is_empty() {
            return Err(TopologyError::EmptyCategory(category.to_string()));
        }
        let total: f64 = candidates.iter().map(|(_, w)| w).sum();
        let r = rng.gen::<f64>() * total;
        Ok(pick_weighted(&candidates, r).to_string())
    }
}

/// Roulette index for a cumulative weight draw `r` in [0, 1).
///
/// Picks the smallest index whose cumulative weight reaches `r`; any draw
/// below the first cumulative bound yields index 0.
pub fn roulette(weights: &[f64], r: f64) -> usize {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut sum = 0.0;
    for w in weights {
        sum += w;
        cumulative.push(sum);
    }

    let mut result = 0;
    for i in 1..cumulative.len() {
        if r < cumulative[0] {
            result = 0;
            break;
        } else if cumulative[i - 1] < r && r <= cumulative[i] {
            result = i;
        }
    }
    result
}

fn roulette_draw<R: Rng>(table: &[(&str, f64)], rng: &mut R) -> usize {
    let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
    roulette(&weights, rng.gen::<f64>())
}

/// First candidate whose running weight sum reaches `r` (drawn in
/// [0, total)); falls back to the first candidate when rounding leaves the
/// tail short.
pub fn pick_weighted<'x>(candidates: &[(&'x str, f64)], r: f64) -> &'x str {
    let mut running = 0.0;
    for &(name, weight) in candidates {
        running += weight;
        if running >= r {
            return name;
        }
    }
    candidates[0].0
}

/// Find an unused pin, preferring the given role and falling back to any
/// unused pin.
fn find_unused_pin(diagram: &Diagram, instance: usize, prefer: PinRole) -> Option<PinRef> {
    let pins = &diagram.instances[instance].pins;
    for (idx, pin) in pins.iter().enumerate() {
        if !pin.used() && pin.role == prefer {
            return Some(PinRef {
                instance,
                pin: idx,
            });
        }
    }
    for (idx, pin) in pins.iter().enumerate() {
        if !pin.used() {
            return Some(PinRef {
                instance,
                pin: idx,
            });
        }
    }
    None
}

fn ring_endpoint(
    diagram: &Diagram,
    instance: usize,
    prefer: PinRole,
) -> Result<PinRef, TopologyError> {
    find_unused_pin(diagram, instance, prefer).ok_or_else(|| TopologyError::Infeasible {
        reference: diagram.instances[instance].property("Reference").to_string(),
    })
}

/// Chain the non-ground instances into one closed loop, output-preferred
/// pin to input-preferred pin.
fn connect_ring<R: Rng>(diagram: &mut Diagram, rng: &mut R) -> Result<(), TopologyError> {
    let members = diagram.ring_members();
    let (head, rest) = match members.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    let mut prev = *head;
    for &current in rest {
        let from = ring_endpoint(diagram, prev, PinRole::Output)?;
        let to = ring_endpoint(diagram, current, PinRole::Input)?;
        diagram.add_wire(from, to, rng);
        prev = current;
    }

    // Close the loop back to the head.
    let from = ring_endpoint(diagram, prev, PinRole::Output)?;
    let to = ring_endpoint(diagram, *head, PinRole::Input)?;
    diagram.add_wire(from, to, rng);
    Ok(())
}

/// Wire the table-designated pin of every >=3-pin instance to ground.
fn ground_actives<R: Rng>(diagram: &mut Diagram, ground_pin: PinRef, rng: &mut R) {
    for handle in diagram.ring_members() {
        let instance = &diagram.instances[handle];
        if instance.pins.len() < 3 {
            continue;
        }
        let Some(number) = family::ground_pin(instance.name()) else {
            continue;
        };
        let Some(pin) = instance.pins.iter().position(|p| p.number == number) else {
            continue;
        };
        diagram.add_wire(
            PinRef {
                instance: handle,
                pin,
            },
            ground_pin,
            rng,
        );
    }
}

/// Wire the first declared pin of every diode-family instance to ground.
fn ground_diodes<R: Rng>(diagram: &mut Diagram, ground_pin: PinRef, rng: &mut R) {
    for handle in diagram.ring_members() {
        let instance = &diagram.instances[handle];
        if family::classify(instance.name()) != "D" || instance.pins.is_empty() {
            continue;
        }
        diagram.add_wire(
            PinRef {
                instance: handle,
                pin: 0,
            },
            ground_pin,
            rng,
        );
    }
}

/// Check that the ring wires form a single cycle visiting every non-ground
/// instance exactly once. Ground taps are ignored.
pub fn is_closed_ring(diagram: &Diagram) -> bool {
    use petgraph::algo::connected_components;
    use petgraph::graph::{NodeIndex, UnGraph};

    let members = diagram.ring_members();
    if members.len() < 2 {
        return members.len() == 1
            && diagram
                .wires
                .iter()
                .any(|w| w.from.instance == members[0] && w.to.instance == members[0]);
    }

    let mut graph = UnGraph::<usize, ()>::new_undirected();
    let nodes: std::collections::HashMap<usize, NodeIndex> = members
        .iter()
        .map(|&handle| (handle, graph.add_node(handle)))
        .collect();

    for wire in &diagram.wires {
        let (Some(&a), Some(&b)) = (
            nodes.get(&wire.from.instance),
            nodes.get(&wire.to.instance),
        ) else {
            continue;
        };
        graph.add_edge(a, b, ());
    }

    graph.edge_count() == members.len()
        && connected_components(&graph) == 1
        && graph
            .node_indices()
            .all(|n| graph.edges(n).count() == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roulette_boundaries() {
        let weights = [0.48, 0.03, 0.26, 0.16, 0.07];
        assert_eq!(roulette(&weights, 0.0), 0);
        assert_eq!(roulette(&weights, 0.9999999), 4);
        assert_eq!(roulette(&weights, 0.47), 0);
        // Exactly on the first bound still lands on index 0.
        assert_eq!(roulette(&weights, 0.48), 0);
        assert_eq!(roulette(&weights, 0.4800001), 1);
        assert_eq!(roulette(&weights, 0.51), 1);
        assert_eq!(roulette(&weights, 0.52), 2);
    }

    #[test]
    fn test_roulette_frequencies() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let weights = [0.48, 0.03, 0.26, 0.16, 0.07];
        let mut counts = [0usize; 5];
        let mut rng = StdRng::seed_from_u64(1234);
        let draws = 1_000_000;
        for _ in 0..draws {
            counts[roulette(&weights, rng.gen::<f64>())] += 1;
        }
        for (count, weight) in counts.iter().zip(weights.iter()) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - weight).abs() < 0.01,
                "observed {observed} for weight {weight}"
            );
        }
    }

    #[test]
    fn test_pick_weighted_uniform() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let candidates = [("a", 1.0), ("b", 1.0), ("c", 1.0)];
        let mut counts = [0usize; 3];
        let mut rng = StdRng::seed_from_u64(99);
        let draws = 60_000;
        for _ in 0..draws {
            let r = rng.gen::<f64>() * 3.0;
            match pick_weighted(&candidates, r) {
                "a" => counts[0] += 1,
                "b" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        for count in counts {
            let observed = count as f64 / draws as f64;
            assert!((observed - 1.0 / 3.0).abs() < 0.02, "observed {observed}");
        }
    }

    #[test]
    fn test_pick_weighted_degenerate() {
        let candidates = [("a", 0.0), ("b", 0.0), ("c", 1.0)];
        assert_eq!(pick_weighted(&candidates, 0.3), "c");
        assert_eq!(pick_weighted(&candidates, 0.999), "c");
        // A draw past the accumulated total falls back to the head.
        assert_eq!(pick_weighted(&candidates, 1.5), "a");
    }
}
