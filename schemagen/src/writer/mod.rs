//! Schematic document assembly.
//!
//! Renders a finished [`Diagram`] into the `kicad_sch` s-expression
//! document consumed by the simulation toolchain: library symbol
//! definitions, wires, analysis directives, placed instances with their
//! simulation annotations, and the trailing symbol-instance index.

pub mod sexpr;

use std::io::Write;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::library::Position;
use crate::diagram::model::{random_uuid, Diagram, Instance, Wire};
use crate::topology::family;
use sexpr::{format_sexp, SExp};

const DOCUMENT_VERSION: i64 = 20211123;

/// Transient/DC analysis directives; one is chosen at random per document.
const ANALYSIS_DIRECTIVES: &[&str] = &[".TRAN 0.1ns 100ns", ".DC V1 0 5 0.2"];

/// Fixed simulator options directive.
const OPTIONS_DIRECTIVE: &str = ".options rshunt=1G chgtol=1e-12";

/// Default switch threshold voltage when no per-instance override is set.
const DEFAULT_SWITCH_VT: &str = "10";

/// Renders diagrams into schematic documents.
pub struct SchematicWriter {
    max_nesting: usize,
}

impl Default for SchematicWriter {
    fn default() -> Self {
        Self { max_nesting: 4 }
    }
}

impl SchematicWriter {
    /// A writer with a custom pretty-print nesting cap.
    pub fn new(max_nesting: usize) -> Self {
        Self { max_nesting }
    }

    /// Render a finished diagram to document text.
    pub fn render<R: Rng>(&self, diagram: &Diagram, rng: &mut R) -> String {
        format_sexp(&self.document(diagram, rng), self.max_nesting)
    }

    /// Render and write to a file.
    pub fn write_file<R: Rng>(
        &self,
        path: &Path,
        diagram: &Diagram,
        rng: &mut R,
    ) -> std::io::Result<()> {
        let content = self.render(diagram, rng);
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())
    }

    /// Assemble the full document tree.
    pub fn document<R: Rng>(&self, diagram: &Diagram, rng: &mut R) -> SExp {
        let mut doc = vec![
            SExp::sym("kicad_sch"),
            SExp::list(vec![SExp::sym("version"), SExp::int(DOCUMENT_VERSION)]),
            SExp::list(vec![SExp::sym("generator"), SExp::sym("eeschema")]),
            SExp::list(vec![
                SExp::sym("uuid"),
                SExp::sym(random_uuid(rng).to_string()),
            ]),
            SExp::list(vec![SExp::sym("paper"), SExp::text("A4")]),
        ];

        let mut lib_symbols = vec![SExp::sym("lib_symbols")];
        for instance in &diagram.instances {
            lib_symbols.push(symbol_definition(instance));
        }
        doc.push(SExp::list(lib_symbols));

        for wire in &diagram.wires {
            doc.push(wire_sexp(diagram, wire));
        }

        doc.push(directive_text(
            ANALYSIS_DIRECTIVES
                .choose(rng)
                .copied()
                .unwrap_or(ANALYSIS_DIRECTIVES[0]),
            Position::new(170.0, 115.0, 0.0),
            rng,
        ));
        doc.push(directive_text(
            OPTIONS_DIRECTIVE,
            Position::new(150.0, 125.0, 0.0),
            rng,
        ));

        for instance in &diagram.instances {
            if family::classify(instance.name()) == "S" {
                doc.push(switch_model_text(instance, rng));
            }
        }

        doc.push(SExp::list(vec![
            SExp::sym("sheet_instances"),
            SExp::list(vec![
                SExp::sym("path"),
                SExp::text("/"),
                SExp::list(vec![SExp::sym("page"), SExp::text("1")]),
            ]),
        ]));

        for (handle, instance) in diagram.instances.iter().enumerate() {
            doc.push(instance_sexp(instance, diagram.is_ground(handle), rng));
        }

        let mut index = vec![SExp::sym("symbol_instances")];
        for instance in &diagram.instances {
            index.push(SExp::list(vec![
                SExp::sym("path"),
                SExp::text(format!("/{}", instance.id)),
                SExp::list(vec![
                    SExp::sym("reference"),
                    SExp::text(instance.property("Reference")),
                ]),
                SExp::list(vec![SExp::sym("unit"), SExp::int(1)]),
                SExp::list(vec![
                    SExp::sym("value"),
                    SExp::text(instance.property("Value")),
                ]),
                SExp::list(vec![
                    SExp::sym("footprint"),
                    SExp::text(instance.property("Footprint")),
                ]),
            ]));
        }
        doc.push(SExp::list(index));

        SExp::list(doc)
    }
}

/// Library definition block for one placed instance's (renamed) template.
fn symbol_definition(instance: &Instance) -> SExp {
    let template = &instance.template;
    let mut sx = vec![
        SExp::sym("symbol"),
        SExp::text(template.qualified_name()),
        SExp::list(vec![SExp::sym("in_bom"), SExp::sym("yes")]),
        SExp::list(vec![SExp::sym("on_board"), SExp::sym("yes")]),
    ];

    for property in &template.properties {
        sx.push(SExp::list(vec![
            SExp::sym("property"),
            SExp::text(property.name.clone()),
            SExp::text(property.value.clone()),
            at(property.offset),
        ]));
    }

    let mut unit = vec![
        SExp::sym("symbol"),
        SExp::text(format!("{}_1_1", template.name)),
    ];
    for pin in &template.pins {
        let role = match pin.role {
            crate::catalog::library::PinRole::Input => "input",
            crate::catalog::library::PinRole::Output => "output",
            crate::catalog::library::PinRole::Passive => "passive",
        };
        unit.push(SExp::list(vec![
            SExp::sym("pin"),
            SExp::sym(role),
            SExp::sym("line"),
            at(pin.offset),
            SExp::list(vec![SExp::sym("number"), SExp::text(pin.number.clone())]),
        ]));
    }
    sx.push(SExp::list(unit));

    SExp::list(sx)
}

fn wire_sexp(diagram: &Diagram, wire: &Wire) -> SExp {
    let from = diagram.pin(wire.from).position;
    let to = diagram.pin(wire.to).position;
    SExp::list(vec![
        SExp::sym("wire"),
        SExp::list(vec![
            SExp::sym("pts"),
            SExp::list(vec![SExp::sym("xy"), SExp::float(from.x), SExp::float(from.y)]),
            SExp::list(vec![SExp::sym("xy"), SExp::float(to.x), SExp::float(to.y)]),
        ]),
        SExp::list(vec![
            SExp::sym("stroke"),
            SExp::list(vec![SExp::sym("width"), SExp::int(0)]),
            SExp::list(vec![SExp::sym("type"), SExp::sym("default")]),
            SExp::list(vec![
                SExp::sym("color"),
                SExp::int(0),
                SExp::int(0),
                SExp::int(0),
                SExp::int(0),
            ]),
        ]),
        SExp::list(vec![
            SExp::sym("uuid"),
            SExp::sym(wire.id.to_string()),
        ]),
    ])
}

fn text_effects() -> SExp {
    SExp::list(vec![
        SExp::sym("effects"),
        SExp::list(vec![
            SExp::sym("font"),
            SExp::list(vec![SExp::sym("size"), SExp::float(1.27), SExp::float(1.27)]),
        ]),
        SExp::list(vec![
            SExp::sym("justify"),
            SExp::sym("left"),
            SExp::sym("bottom"),
        ]),
    ])
}

/// Free-text block at a fixed document coordinate.
fn directive_text<R: Rng>(content: &str, pos: Position, rng: &mut R) -> SExp {
    SExp::list(vec![
        SExp::sym("text"),
        SExp::text(content),
        at(pos),
        text_effects(),
        SExp::list(vec![
            SExp::sym("uuid"),
            SExp::sym(random_uuid(rng).to_string()),
        ]),
    ])
}

/// Behavioral switch model directive, parameterized by the instance's
/// sequence number and threshold override.
fn switch_model_text<R: Rng>(instance: &Instance, rng: &mut R) -> SExp {
    let vt = instance.override_or("vt", DEFAULT_SWITCH_VT);
    let model = format!(
        ".model sw_push{} sw(vt={} vh=0.2 ron=1 roff=10k)",
        instance.index, vt
    );
    directive_text(&model, Position::new(67.31, 38.1, 0.0), rng)
}

fn at(pos: Position) -> SExp {
    SExp::list(vec![
        SExp::sym("at"),
        SExp::float(pos.x),
        SExp::float(pos.y),
        SExp::float(pos.rotation),
    ])
}

fn property_sexp(name: &str, value: &str, id: i64, pos: Position, hidden: bool) -> SExp {
    let mut sx = vec![
        SExp::sym("property"),
        SExp::text(name),
        SExp::text(value),
        SExp::list(vec![SExp::sym("id"), SExp::int(id)]),
        at(pos),
    ];
    if hidden {
        sx.push(SExp::list(vec![
            SExp::sym("effects"),
            SExp::list(vec![
                SExp::sym("font"),
                SExp::list(vec![SExp::sym("size"), SExp::float(1.27), SExp::float(1.27)]),
            ]),
            SExp::sym("hide"),
        ]));
    }
    SExp::list(sx)
}

/// Placed-instance block: identity, placement, declared properties, and,
/// for everything but the ground part, the simulation annotations.
fn instance_sexp<R: Rng>(instance: &Instance, is_ground: bool, rng: &mut R) -> SExp {
    let mut sx = vec![
        SExp::sym("symbol"),
        SExp::list(vec![
            SExp::sym("lib_id"),
            SExp::text(instance.qualified_name()),
        ]),
        at(instance.anchor),
        SExp::list(vec![SExp::sym("unit"), SExp::int(1)]),
        SExp::list(vec![SExp::sym("in_bom"), SExp::sym("yes")]),
        SExp::list(vec![SExp::sym("on_board"), SExp::sym("yes")]),
        SExp::list(vec![SExp::sym("fields_autoplaced")]),
        SExp::list(vec![
            SExp::sym("uuid"),
            SExp::sym(instance.id.to_string()),
        ]),
    ];

    for (id, property) in instance.template.properties.iter().enumerate() {
        sx.push(property_sexp(
            &property.name,
            &property.value,
            id as i64,
            property.offset.translated(instance.anchor),
            property.name == "Footprint",
        ));
    }

    if !is_ground {
        push_simulation_properties(&mut sx, instance, rng);
    }

    for pin in &instance.pins {
        sx.push(SExp::list(vec![
            SExp::sym("pin"),
            SExp::text(pin.number.clone()),
            SExp::list(vec![
                SExp::sym("uuid"),
                SExp::sym(random_uuid(rng).to_string()),
            ]),
        ]));
    }

    SExp::list(sx)
}

/// The fixed annotation sequence: primitive, model value, netlist-enabled
/// marker, then the optional library path and node sequence.
fn push_simulation_properties<R: Rng>(sx: &mut Vec<SExp>, instance: &Instance, rng: &mut R) {
    let spec = family::part_spec(instance.name());
    let anchor = instance.anchor;

    let primitive = spec
        .and_then(|s| s.primitive)
        .map(str::to_string)
        .unwrap_or_else(|| {
            instance
                .property("Reference")
                .chars()
                .next()
                .map(String::from)
                .unwrap_or_default()
        });
    sx.push(property_sexp("Spice_Primitive", &primitive, 4, anchor, true));

    let model = match spec {
        Some(s) => s.value.draw(rng, instance.index),
        None => String::new(),
    };
    sx.push(property_sexp("Spice_Model", &model, 5, anchor, true));

    sx.push(property_sexp("Spice_Netlist_Enabled", "Y", 6, anchor, true));

    if let Some(lib_path) = spec.and_then(|s| s.lib_path) {
        sx.push(property_sexp("Spice_Lib_File", lib_path, 7, anchor, true));
    }
    if let Some(sequence) = spec.and_then(|s| s.node_sequence) {
        sx.push(property_sexp("Spice_Node_Sequence", sequence, 8, anchor, true));
    }
}
