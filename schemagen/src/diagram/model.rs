//! In-progress circuit model.
//!
//! A [`Diagram`] owns the ordered instances and wires of one generation
//! run. Pins are created once per instance at construction time and are
//! addressed by [`PinRef`] handles (instance index, pin index) so that
//! wires never alias instance storage.

use std::collections::HashMap;

use rand::Rng;
use uuid::Uuid;

use crate::catalog::library::{PinRole, Position};
use crate::catalog::selector::PartPick;

/// Draw a v4 uuid from the run's random stream, so replayed draw sequences
/// reproduce identical documents.
pub(crate) fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// One pin of a placed instance.
#[derive(Debug, Clone)]
pub struct Pin {
    pub number: String,
    pub role: PinRole,
    /// Offset relative to the instance anchor, from the template.
    pub offset: Position,
    /// Absolute position; valid after `Diagram::finalize_positions`.
    pub position: Position,
    used: bool,
}

impl Pin {
    pub fn used(&self) -> bool {
        self.used
    }

    /// Mark the pin connected. The flag only ever moves false -> true;
    /// re-marking is legal and has no further effect.
    pub fn mark_used(&mut self) {
        self.used = true;
    }
}

/// A placed copy of a template.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: Uuid,
    pub template: crate::catalog::library::Template,
    /// Per-category sequence number assigned at selection time.
    pub index: u32,
    pub anchor: Position,
    /// Per-instance parameter overrides (e.g. a switch threshold "vt").
    pub overrides: HashMap<String, String>,
    pub pins: Vec<Pin>,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn qualified_name(&self) -> String {
        self.template.qualified_name()
    }

    /// Declared property value; missing properties degrade to "".
    pub fn property(&self, name: &str) -> &str {
        self.template.property(name)
    }

    /// Override value, e.g. `override_or("vt", "10")`.
    pub fn override_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.overrides.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// Handle to one pin of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRef {
    pub instance: usize,
    pub pin: usize,
}

/// A connection between two pins. Creating one marks both endpoints used.
#[derive(Debug, Clone)]
pub struct Wire {
    pub id: Uuid,
    pub from: PinRef,
    pub to: PinRef,
}

/// Ordered instances plus ordered wires; one per generation run.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub instances: Vec<Instance>,
    pub wires: Vec<Wire>,
    ground: Option<usize>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a selected part, creating one pin per template pin in
    /// declaration order. Returns the new instance's handle.
    pub fn add_instance<R: Rng>(&mut self, pick: PartPick, rng: &mut R) -> usize {
        let pins = pick
            .template
            .pins
            .iter()
            .map(|def| Pin {
                number: def.number.clone(),
                role: def.role,
                offset: def.offset,
                position: def.offset,
                used: false,
            })
            .collect();
        self.instances.push(Instance {
            id: random_uuid(rng),
            template: pick.template,
            index: pick.index,
            anchor: Position::default(),
            overrides: HashMap::new(),
            pins,
        });
        self.instances.len() - 1
    }

    /// Connect two pins. Both endpoints are unconditionally marked used;
    /// duplicate wires are not rejected.
    pub fn add_wire<R: Rng>(&mut self, from: PinRef, to: PinRef, rng: &mut R) {
        self.pin_mut(from).mark_used();
        self.pin_mut(to).mark_used();
        self.wires.push(Wire {
            id: random_uuid(rng),
            from,
            to,
        });
    }

    pub fn pin(&self, r: PinRef) -> &Pin {
        &self.instances[r.instance].pins[r.pin]
    }

    fn pin_mut(&mut self, r: PinRef) -> &mut Pin {
        &mut self.instances[r.instance].pins[r.pin]
    }

    /// Record which instance is the ground/reference part.
    pub fn set_ground(&mut self, handle: usize) {
        self.ground = Some(handle);
    }

    pub fn ground(&self) -> Option<usize> {
        self.ground
    }

    pub fn is_ground(&self, handle: usize) -> bool {
        self.ground == Some(handle)
    }

    /// Handles of every instance that is not the ground part, in append
    /// order. Ring adjacency is defined solely by this order.
    pub fn ring_members(&self) -> Vec<usize> {
        (0..self.instances.len())
            .filter(|&i| !self.is_ground(i))
            .collect()
    }

    /// Compute every pin's absolute position from its instance anchor.
    /// A pure function of the anchors already assigned by layout.
    pub fn finalize_positions(&mut self) {
        for instance in &mut self.instances {
            for pin in &mut instance.pins {
                pin.position = pin.offset.translated(instance.anchor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::library::{PinDef, Property, Template};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pick(name: &str, pins: usize) -> PartPick {
        PartPick {
            template: Template {
                lib_name: "test".to_string(),
                name: name.to_string(),
                properties: vec![Property {
                    name: "Reference".to_string(),
                    value: format!("{}1", name),
                    offset: Position::default(),
                }],
                pins: (1..=pins)
                    .map(|n| PinDef {
                        number: n.to_string(),
                        offset: Position::new(0.0, n as f64 * 2.54, 0.0),
                        role: PinRole::Passive,
                    })
                    .collect(),
            },
            index: 1,
        }
    }

    #[test]
    fn test_add_instance_creates_pins_in_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut diagram = Diagram::new();
        let handle = diagram.add_instance(pick("R", 2), &mut rng);
        let instance = &diagram.instances[handle];
        assert_eq!(instance.pins.len(), 2);
        assert_eq!(instance.pins[0].number, "1");
        assert_eq!(instance.pins[1].number, "2");
        assert!(!instance.pins[0].used());
    }

    #[test]
    fn test_add_wire_marks_both_endpoints() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut diagram = Diagram::new();
        let a = diagram.add_instance(pick("R", 2), &mut rng);
        let b = diagram.add_instance(pick("CAP", 2), &mut rng);

        let from = PinRef { instance: a, pin: 0 };
        let to = PinRef { instance: b, pin: 1 };
        diagram.add_wire(from, to, &mut rng);

        assert_eq!(diagram.wires.len(), 1);
        assert!(diagram.pin(from).used());
        assert!(diagram.pin(to).used());
        assert!(!diagram.pin(PinRef { instance: a, pin: 1 }).used());

        // Re-marking an endpoint is idempotent.
        diagram.add_wire(from, to, &mut rng);
        assert_eq!(diagram.wires.len(), 2);
        assert!(diagram.pin(from).used());
    }

    #[test]
    fn test_finalize_positions_sums_anchor_and_offset() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut diagram = Diagram::new();
        let handle = diagram.add_instance(pick("R", 1), &mut rng);
        diagram.instances[handle].anchor = Position::new(34.0, 158.0, 0.0);
        diagram.finalize_positions();

        let pin = &diagram.instances[handle].pins[0];
        assert!((pin.position.x - 34.0).abs() < 1e-9);
        assert!((pin.position.y - 160.54).abs() < 1e-9);
    }

    #[test]
    fn test_ring_members_exclude_ground() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut diagram = Diagram::new();
        let a = diagram.add_instance(pick("R", 2), &mut rng);
        let g = diagram.add_instance(pick("0", 1), &mut rng);
        let b = diagram.add_instance(pick("CAP", 2), &mut rng);
        diagram.set_ground(g);

        assert_eq!(diagram.ring_members(), vec![a, b]);
        assert!(diagram.is_ground(g));
    }
}
