//! Deterministic near-circular placement.
//!
//! Instances are walked in append order through four angular quadrants of
//! ⌈count/4⌉+1 instances each. A running anchor starts at a fixed origin;
//! each step applies the quadrant's stride scaled by the within-quadrant
//! counter, which yields a readable, roughly circular arrangement for any
//! instance count without collision detection.

use crate::diagram::model::Diagram;

const ORIGIN_X: f64 = 34.0;
const ORIGIN_Y: f64 = 158.0;

pub struct LayoutEngine;

impl LayoutEngine {
    /// Assign an absolute anchor to every instance (ground included).
    /// Rotation is always 0.
    pub fn assign_positions(diagram: &mut Diagram) {
        let count = diagram.instances.len();
        // Smallest k at which the quadrant rolls over.
        let rollover = count.div_ceil(4) + 1;

        let mut quadrant = 0usize;
        let mut k = 0usize;
        let (mut x, mut y) = (ORIGIN_X, ORIGIN_Y);

        for (idx, instance) in diagram.instances.iter_mut().enumerate() {
            if k >= rollover {
                k = 0;
                quadrant += 1;
            }
            k += 1;

            // The first instance keeps the origin unchanged.
            if idx > 0 {
                let step = k as f64;
                match quadrant {
                    0 => {
                        x += step;
                        y -= step * 5.0;
                    }
                    1 => {
                        x += step * 5.0;
                        y += step;
                    }
                    2 => {
                        x -= step;
                        y += step * 5.0;
                    }
                    _ => {
                        x -= step * 5.0;
                        y -= step;
                    }
                }
            }

            instance.anchor.x = x;
            instance.anchor.y = y;
            instance.anchor.rotation = 0.0;
        }
    }
}
