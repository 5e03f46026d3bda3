//! Factory patches embedded in the library.
//!
//! Patches are stored as TOML graph documents and parsed on demand.

use patchbay_core::GraphDef;

use crate::ConfigError;
use crate::document::{GraphFormat, parse_graph};

/// A built-in graph document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FactoryPatch {
    /// Lookup name (snake_case).
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    source: &'static str,
}

impl FactoryPatch {
    /// The embedded TOML document.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Parses the embedded document.
    pub fn graph(&self) -> Result<GraphDef, ConfigError> {
        parse_graph(self.source, GraphFormat::Toml)
    }
}

/// Every factory patch, in listing order.
pub static FACTORY_PATCHES: &[FactoryPatch] = &[
    FactoryPatch {
        name: "default",
        description: "LFO sweeping a VCA over a sawtooth, panned to stereo",
        source: DEFAULT_PATCH,
    },
    FactoryPatch {
        name: "feedback_fm",
        description: "Two sine oscillators frequency-modulating each other",
        source: FEEDBACK_FM_PATCH,
    },
    FactoryPatch {
        name: "slew_loop",
        description: "Free-running slew envelope gating a square wave",
        source: SLEW_LOOP_PATCH,
    },
    FactoryPatch {
        name: "dub_delay",
        description: "Gated triangle into a feedback delay, drifting across the stereo field",
        source: DUB_DELAY_PATCH,
    },
];

/// Names of all factory patches.
pub static FACTORY_PATCH_NAMES: &[&str] = &["default", "feedback_fm", "slew_loop", "dub_delay"];

/// Default patch - the reference graph.
const DEFAULT_PATCH: &str = r#"
[[modules]]
id = "lfo1"
kind = "LFO"
params = { freq = -5 }

[[modules]]
id = "vco1"
kind = "VCO"
params = { freq = 6 }

[[modules]]
id = "vca1"
kind = "VCA"

[[modules]]
id = "pan1"
kind = "PAN"

[[modules]]
id = "out"
kind = "OUTPUT"

[[connections]]
from = "lfo1.out"
to = "vca1.cv"

[[connections]]
from = "vco1.out"
to = "vca1.in"

[[connections]]
from = "vca1.out"
to = "pan1.in"

[[connections]]
from = "pan1.outL"
to = "out.inL"

[[connections]]
from = "pan1.outR"
to = "out.inR"
"#;

/// Feedback FM patch - a two-oscillator cycle.
const FEEDBACK_FM_PATCH: &str = r#"
[[modules]]
id = "carrier"
kind = "VCO"
params = { freq = 5, shape = "sine", fmSensitivity = 80 }

[[modules]]
id = "modulator"
kind = "VCO"
params = { freq = 5.5, shape = "sine", fmSensitivity = 120 }

[[modules]]
id = "swell"
kind = "LFO"
params = { freq = -6, shape = "tri" }

[[modules]]
id = "vca1"
kind = "VCA"

[[modules]]
id = "drift"
kind = "LFO"
params = { freq = -7 }

[[modules]]
id = "pan1"
kind = "PAN"

[[modules]]
id = "out"
kind = "OUTPUT"

[[connections]]
from = "modulator.out"
to = "carrier.fm"

[[connections]]
from = "carrier.out"
to = "modulator.fm"

[[connections]]
from = "carrier.out"
to = "vca1.in"

[[connections]]
from = "swell.out"
to = "vca1.cv"

[[connections]]
from = "vca1.out"
to = "pan1.in"

[[connections]]
from = "drift.out"
to = "pan1.pan"

[[connections]]
from = "pan1.outL"
to = "out.inL"

[[connections]]
from = "pan1.outR"
to = "out.inR"
"#;

/// Slew loop patch - unpatched slew as a looping envelope.
const SLEW_LOOP_PATCH: &str = r#"
[[modules]]
id = "env"
kind = "SLEW"
params = { riseTime = 2.0, fallTime = 0.5 }

[[modules]]
id = "vco1"
kind = "VCO"
params = { freq = 4, shape = "square" }

[[modules]]
id = "vca1"
kind = "VCA"

[[modules]]
id = "rect"
kind = "RECTIFIER"

[[modules]]
id = "wobble"
kind = "LFO"
params = { freq = -4 }

[[modules]]
id = "pan1"
kind = "PAN"

[[modules]]
id = "out"
kind = "OUTPUT"

[[connections]]
from = "env.out"
to = "vca1.cv"

[[connections]]
from = "vco1.out"
to = "vca1.in"

[[connections]]
from = "vca1.out"
to = "pan1.in"

[[connections]]
from = "wobble.out"
to = "rect.in"

[[connections]]
from = "rect.out"
to = "vco1.pitch"

[[connections]]
from = "wobble.out"
to = "pan1.pan"

[[connections]]
from = "pan1.outL"
to = "out.inL"

[[connections]]
from = "pan1.outR"
to = "out.inR"
"#;

/// Dub delay patch - gated triangle through a long feedback delay.
const DUB_DELAY_PATCH: &str = r#"
[[modules]]
id = "vco1"
kind = "VCO"
params = { freq = 5, shape = "tri" }

[[modules]]
id = "gate"
kind = "LFO"
params = { freq = -3, shape = "square" }

[[modules]]
id = "vca1"
kind = "VCA"

[[modules]]
id = "echo"
kind = "DELAY"
params = { delayTime = 0.375, feedback = 0.6, mix = 0.5 }

[[modules]]
id = "tape"
kind = "LFO"
params = { freq = -8 }

[[modules]]
id = "pan1"
kind = "PAN"
params = { pan = -0.3 }

[[modules]]
id = "out"
kind = "OUTPUT"

[[connections]]
from = "vco1.out"
to = "vca1.in"

[[connections]]
from = "gate.out"
to = "vca1.cv"

[[connections]]
from = "vca1.out"
to = "echo.in"

[[connections]]
from = "tape.out"
to = "pan1.pan"

[[connections]]
from = "echo.out"
to = "pan1.in"

[[connections]]
from = "pan1.outL"
to = "out.inL"

[[connections]]
from = "pan1.outR"
to = "out.inR"
"#;

/// Looks up a factory patch by name (case-insensitive).
pub fn get_factory_patch(name: &str) -> Option<&'static FactoryPatch> {
    FACTORY_PATCHES
        .iter()
        .find(|patch| patch.name.eq_ignore_ascii_case(name))
}

/// Parses a factory patch by name.
pub fn factory_patch(name: &str) -> Result<GraphDef, ConfigError> {
    get_factory_patch(name)
        .ok_or_else(|| ConfigError::PatchNotFound(name.to_string()))?
        .graph()
}

/// Check if a name refers to a factory patch.
pub fn is_factory_patch(name: &str) -> bool {
    get_factory_patch(name).is_some()
}
