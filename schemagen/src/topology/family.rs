//! Per-part dispatch table.
//!
//! Every per-part decision lives in one static table keyed by template name:
//! the single-letter family code used for reference numbering, the grounded
//! pin of three-terminal actives, the simulation value distribution, and the
//! optional model-library path. Both the topology builder and the document
//! assembler consult this table; nothing else switches on part names.

use rand::Rng;

/// How a part's `Spice_Model` value is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSpec {
    /// Uniform integer draw in 1..=1000, no unit suffix.
    Resistance,
    /// Uniform integer draw in 1..=1000 with an `nF` suffix.
    Capacitance,
    /// Either 1..=1000 `uH` or 10..=100 `mH`, chosen at random.
    Inductance,
    /// `dc N` with N drawn from 3..=100.
    DcSupply,
    /// A fixed model name from the part table.
    Model(&'static str),
    /// `1 0 sw_push{index}` referencing the per-instance behavioral model.
    SwitchModel,
}

impl ValueSpec {
    /// Draw one value string. `index` is the instance's per-category
    /// sequence number, used by switch models.
    pub fn draw<R: Rng>(&self, rng: &mut R, index: u32) -> String {
        match self {
            ValueSpec::Resistance => rng.gen_range(1..=1000).to_string(),
            ValueSpec::Capacitance => format!("{}nF", rng.gen_range(1..=1000)),
            ValueSpec::Inductance => {
                let micro = format!("{}uH", rng.gen_range(1..=1000));
                let milli = format!("{}mH", rng.gen_range(10..=100));
                if rng.gen_bool(0.5) {
                    micro
                } else {
                    milli
                }
            }
            ValueSpec::DcSupply => format!("dc {}", rng.gen_range(3..=100)),
            ValueSpec::Model(name) => (*name).to_string(),
            ValueSpec::SwitchModel => format!("1 0 sw_push{}", index),
        }
    }
}

/// Static per-part record.
#[derive(Debug, Clone, Copy)]
pub struct PartSpec {
    pub name: &'static str,
    /// Single-letter family code ("R", "C", "L", "D", "Q", "S", "?").
    pub family: &'static str,
    /// Pin number wired to ground when the part declares three or more pins.
    pub ground_pin: Option<&'static str>,
    pub value: ValueSpec,
    /// Opaque model-library path; emitted verbatim, never resolved.
    pub lib_path: Option<&'static str>,
    /// `Spice_Primitive` override; None uses the reference prefix's first
    /// character. Three-terminal parts simulated as subcircuits use "X".
    pub primitive: Option<&'static str>,
    /// `Spice_Node_Sequence` annotation for parts whose model pin order
    /// differs from the symbol's.
    pub node_sequence: Option<&'static str>,
}

const fn part(name: &'static str, family: &'static str, value: ValueSpec) -> PartSpec {
    PartSpec {
        name,
        family,
        ground_pin: None,
        value,
        lib_path: None,
        primitive: None,
        node_sequence: None,
    }
}

const fn diode(name: &'static str, model: &'static str, lib: &'static str) -> PartSpec {
    PartSpec {
        name,
        family: "D",
        ground_pin: None,
        value: ValueSpec::Model(model),
        lib_path: Some(lib),
        primitive: None,
        node_sequence: None,
    }
}

const MICROCAP_DIODE: &str = r"D:\spice_lib\MicroCap-LIBRARY-for-ngspice\diode.lib";
const MICROCAP_DIODESINC: &str = r"D:\spice_lib\MicroCap-LIBRARY-for-ngspice\DiodesInc.lib";
const BASIC_DIODE: &str = r"D:\spice_lib\basic_models\diodes\diode.lib";
const LED_LIB: &str = r"D:\spice_lib\KiCad-Spice-Library-master\Models\Diode\led.lib";
const ZENER_LIB: &str = r"D:\spice_lib\KiCad-Spice-Library-master\Models\Diode\zener.lib";

static PARTS: &[PartSpec] = &[
    // Passives.
    part("R", "R", ValueSpec::Resistance),
    part("R_Variable", "R", ValueSpec::Resistance),
    part("R_Photo", "R", ValueSpec::Resistance),
    part("R_Trim", "R", ValueSpec::Resistance),
    part("R_US", "R", ValueSpec::Resistance),
    part("CAP", "C", ValueSpec::Capacitance),
    part("C_Variable", "C", ValueSpec::Capacitance),
    part("C_Polarized", "C", ValueSpec::Capacitance),
    part("C_Polarized_US", "C", ValueSpec::Capacitance),
    part("INDUCTOR", "L", ValueSpec::Inductance),
    part("L_Ferrite", "L", ValueSpec::Inductance),
    part("L_Iron", "L", ValueSpec::Inductance),
    part("L_Iron_Small", "L", ValueSpec::Inductance),
    part("L_Small", "L", ValueSpec::Inductance),
    part("L_Trim", "L", ValueSpec::Inductance),
    // Supplies.
    part("VSOURCE", "?", ValueSpec::DcSupply),
    part("ISOURCE", "?", ValueSpec::DcSupply),
    // Diodes.
    diode("DIODE", "1N3491", MICROCAP_DIODE),
    diode("D_Schottky", "1N5711", MICROCAP_DIODE),
    diode("D_Zener", "10A01", MICROCAP_DIODESINC),
    diode("1N4001", "1N4001", BASIC_DIODE),
    diode("D", "1N4002", BASIC_DIODE),
    diode("D_Filled", "1N4003", BASIC_DIODE),
    diode("D_Small", "1N4004", BASIC_DIODE),
    PartSpec {
        name: "LED",
        family: "D",
        ground_pin: None,
        value: ValueSpec::Model("A1SS-O612_VFBIN_D"),
        lib_path: Some(r"D:\spice_lib\basic_models\LED\SnapLED150.mod"),
        primitive: None,
        node_sequence: None,
    },
    diode("LED_Filled", "LED_GENERAL", LED_LIB),
    diode("D_Zener_Filled", "DI_1N4728A", ZENER_LIB),
    diode("D_Zener_Small", "DI_AZ23C10W", ZENER_LIB),
    // Transistors.
    PartSpec {
        name: "Q_NPN_BCE",
        family: "Q",
        ground_pin: Some("2"),
        value: ValueSpec::Model("PN2222"),
        lib_path: Some(r"D:\spice_lib\modelos_subckt\PN2222.mod"),
        primitive: None,
        node_sequence: Some("2,1,3"),
    },
    PartSpec {
        name: "PN2222A",
        family: "Q",
        ground_pin: Some("3"),
        value: ValueSpec::Model("PN2222"),
        lib_path: Some(r"D:\spice_lib\modelos_subckt\PN2222.mod"),
        primitive: None,
        node_sequence: Some("2,1,3"),
    },
    PartSpec {
        name: "Q_PJFET_DGS",
        family: "Q",
        ground_pin: Some("1"),
        value: ValueSpec::Model("DMG4435SSS"),
        lib_path: Some(r"D:\spice_lib\MicroCap-LIBRARY-for-ngspice\DiodesInc_FET.lib"),
        primitive: Some("X"),
        node_sequence: None,
    },
    PartSpec {
        name: "Q_PMOS_DGS",
        family: "Q",
        ground_pin: Some("1"),
        value: ValueSpec::Model("DI_DMG6968UDM"),
        lib_path: Some(r"D:\spice_lib\MicroCap-LIBRARY-for-ngspice\DiodesInc_MOSFET.LIB"),
        primitive: Some("X"),
        node_sequence: None,
    },
    PartSpec {
        name: "Q_NIGBT_CEG",
        family: "Q",
        ground_pin: Some("2"),
        value: ValueSpec::Model("APT100G2"),
        lib_path: Some(
            r"D:\spice_lib\KiCad-Spice-Library-master\Models\uncategorized\spice_complete\IGBT.LIB",
        ),
        primitive: Some("X"),
        node_sequence: None,
    },
    // Switches.
    part("SW_Push", "S", ValueSpec::SwitchModel),
];

/// Look up the dispatch record for a template name.
pub fn part_spec(name: &str) -> Option<&'static PartSpec> {
    PARTS.iter().find(|p| p.name == name)
}

/// Canonical family code for a template name; names outside the table map
/// to themselves.
pub fn classify(name: &str) -> &str {
    match part_spec(name) {
        Some(spec) => spec.family,
        None => name,
    }
}

/// Ground-pin number for a template name, if its family grounds one.
pub fn ground_pin(name: &str) -> Option<&'static str> {
    part_spec(name).and_then(|p| p.ground_pin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classification() {
        assert_eq!(classify("R_Photo"), "R");
        assert_eq!(classify("C_Polarized_US"), "C");
        assert_eq!(classify("L_Iron_Small"), "L");
        assert_eq!(classify("1N4001"), "D");
        assert_eq!(classify("PN2222A"), "Q");
        assert_eq!(classify("SW_Push"), "S");
        assert_eq!(classify("VSOURCE"), "?");
        // Names outside the table map to themselves.
        assert_eq!(classify("0"), "0");
        assert_eq!(classify("MYSTERY"), "MYSTERY");
    }

    #[test]
    fn test_ground_pins() {
        assert_eq!(ground_pin("Q_NPN_BCE"), Some("2"));
        assert_eq!(ground_pin("PN2222A"), Some("3"));
        assert_eq!(ground_pin("Q_PJFET_DGS"), Some("1"));
        assert_eq!(ground_pin("Q_PMOS_DGS"), Some("1"));
        assert_eq!(ground_pin("Q_NIGBT_CEG"), Some("2"));
        assert_eq!(ground_pin("R"), None);
        assert_eq!(ground_pin("DIODE"), None);
    }

    #[test]
    fn test_value_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let r: i64 = ValueSpec::Resistance.draw(&mut rng, 1).parse().unwrap();
            assert!((1..=1000).contains(&r));

            let c = ValueSpec::Capacitance.draw(&mut rng, 1);
            assert!(c.ends_with("nF"));

            let l = ValueSpec::Inductance.draw(&mut rng, 1);
            assert!(l.ends_with("uH") || l.ends_with("mH"));

            let dc = ValueSpec::DcSupply.draw(&mut rng, 1);
            assert!(dc.starts_with("dc "));
        }
        assert_eq!(ValueSpec::Model("1N3491").draw(&mut rng, 1), "1N3491");
        assert_eq!(ValueSpec::SwitchModel.draw(&mut rng, 4), "1 0 sw_push4");
    }

    #[test]
    fn test_primitive_overrides() {
        assert_eq!(part_spec("Q_PMOS_DGS").unwrap().primitive, Some("X"));
        assert_eq!(part_spec("Q_NPN_BCE").unwrap().primitive, None);
        assert!(part_spec("Q_NPN_BCE").unwrap().node_sequence.is_some());
    }
}
