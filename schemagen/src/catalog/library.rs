//! Part templates and symbol-library catalogs.
//!
//! A [`Catalog`] is a read-only set of [`Template`]s imported from a
//! `kicad_symbol_lib` s-expression file. Only the data the generator needs
//! is retained: the symbol's properties (in declaration order, with the
//! reference-designator prefix first) and its pins (number, relative
//! placement, electrical role).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::writer::sexpr::{SExp, SExpParser};

/// Error type for catalog imports.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] crate::writer::sexpr::ParseError),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// An (x, y, rotation) triple, used for both relative offsets and absolute
/// placements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// Component-wise sum, used when turning relative offsets absolute.
    pub fn translated(self, by: Position) -> Position {
        Position {
            x: self.x + by.x,
            y: self.y + by.y,
            rotation: self.rotation + by.rotation,
        }
    }
}

/// Electrical role of a template pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinRole {
    Input,
    Output,
    Passive,
}

impl PinRole {
    /// Map a `kicad_symbol_lib` electrical-type token. Anything that is not
    /// explicitly an input or output participates as passive.
    pub fn from_token(token: &str) -> Self {
        match token {
            "input" => PinRole::Input,
            "output" => PinRole::Output,
            _ => PinRole::Passive,
        }
    }
}

/// A named property declared on a template (Reference, Value, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
    /// Placement of the property text relative to the symbol anchor.
    pub offset: Position,
}

/// A pin declared on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDef {
    pub number: String,
    pub offset: Position,
    pub role: PinRole,
}

/// An immutable part definition from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub lib_name: String,
    pub name: String,
    pub properties: Vec<Property>,
    pub pins: Vec<PinDef>,
}

impl Template {
    /// `lib:name`, the identity used in `lib_id` references.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.lib_name, self.name)
    }

    /// Value of a declared property; missing properties degrade to "".
    pub fn property(&self, name: &str) -> &str {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
            .unwrap_or("")
    }
}

/// An ordered collection of templates imported from one library file.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    pub templates: Vec<Template>,
}

impl Catalog {
    /// Import a catalog from a `.kicad_sym` file. The catalog name is the
    /// file stem.
    pub fn from_file(path: &Path) -> Result<Catalog, CatalogError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("library")
            .to_string();
        let content = std::fs::read_to_string(path)?;
        Self::from_source(&name, &content)
    }

    /// Import a catalog from library text.
    pub fn from_source(name: &str, content: &str) -> Result<Catalog, CatalogError> {
        let root = SExpParser::new(content).parse()?;
        let items = root
            .as_list()
            .ok_or_else(|| CatalogError::InvalidFormat("expected a top-level list".into()))?;
        if items.first().and_then(SExp::as_sym) != Some("kicad_symbol_lib") {
            return Err(CatalogError::InvalidFormat(
                "expected a kicad_symbol_lib document".into(),
            ));
        }

        let mut templates = Vec::new();
        for entry in root.children("symbol") {
            templates.push(parse_symbol(name, entry)?);
        }

        Ok(Catalog {
            name: name.to_string(),
            templates,
        })
    }
}

fn parse_symbol(lib_name: &str, entry: &[SExp]) -> Result<Template, CatalogError> {
    let symbol_name = entry
        .get(1)
        .and_then(SExp::as_atom)
        .ok_or_else(|| CatalogError::InvalidFormat("symbol without a name".into()))?
        .to_string();

    let node = SExp::List(entry.to_vec());
    let mut properties = Vec::new();
    for prop in node.children("property") {
        let name = prop.get(1).and_then(SExp::as_atom).unwrap_or("").to_string();
        let value = prop.get(2).and_then(SExp::as_atom).unwrap_or("").to_string();
        let offset = parse_at(&SExp::List(prop.to_vec()));
        properties.push(Property {
            name,
            value,
            offset,
        });
    }

    // Pins live in unit sub-symbols ("R_1_1"), but accept them directly
    // under the symbol as well.
    let mut pins = Vec::new();
    collect_pins(&node, &mut pins);
    for unit in node.children("symbol") {
        collect_pins(&SExp::List(unit.to_vec()), &mut pins);
    }

    Ok(Template {
        lib_name: lib_name.to_string(),
        name: symbol_name,
        properties,
        pins,
    })
}

fn collect_pins(node: &SExp, pins: &mut Vec<PinDef>) {
    for pin in node.children("pin") {
        let role = pin
            .get(1)
            .and_then(SExp::as_sym)
            .map(PinRole::from_token)
            .unwrap_or(PinRole::Passive);
        let pin_node = SExp::List(pin.to_vec());
        let offset = parse_at(&pin_node);
        let number = pin_node
            .child("number")
            .and_then(|n| n.get(1))
            .and_then(SExp::as_atom)
            .unwrap_or("")
            .to_string();
        pins.push(PinDef {
            number,
            offset,
            role,
        });
    }
}

fn parse_at(node: &SExp) -> Position {
    match node.child("at") {
        Some(at) => Position {
            x: at.get(1).and_then(SExp::as_f64).unwrap_or(0.0),
            y: at.get(2).and_then(SExp::as_f64).unwrap_or(0.0),
            rotation: at.get(3).and_then(SExp::as_f64).unwrap_or(0.0),
        },
        None => Position::default(),
    }
}
