//! Which components are active for a given set of control settings.

use crate::catalog::{self, COMPONENT_COUNT, ComponentId};
use crate::control::ControlSettings;

/// A control-file condition a component depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Daily,
    Wells,
    /// Reach-based instream flow demands (`ireach` 2 or 3).
    ReachInstream,
    SanJuan,
    IrrigationPractice,
    VariableEfficiency,
    SoilMoisture,
    /// Storage aliases of another component; never shown or written.
    Never,
}

impl Gate {
    /// True when the gating data is present in the dataset, which is also
    /// when a legacy response file carries the line.
    pub fn is_open(self, settings: &ControlSettings) -> bool {
        match self {
            Gate::Daily => settings.has_daily_data(),
            Gate::Wells => settings.has_well_data(),
            Gate::ReachInstream => settings.has_reach_instream_demand(),
            Gate::SanJuan => settings.has_san_juan_data(),
            Gate::IrrigationPractice => settings.has_irrigation_practice_data(),
            Gate::VariableEfficiency => settings.has_variable_efficiency(),
            Gate::SoilMoisture => settings.has_soil_moisture_data(),
            Gate::Never => false,
        }
    }

    /// True when the gating switch is positive, making the file mandatory.
    pub fn is_active(self, settings: &ControlSettings) -> bool {
        match self {
            Gate::Daily => settings.iday.is_active(),
            Gate::Wells => settings.iwell.is_active(),
            Gate::ReachInstream => settings.has_reach_instream_demand(),
            Gate::SanJuan => settings.isjrip.is_active(),
            Gate::IrrigationPractice => settings.itsfile.is_active(),
            Gate::VariableEfficiency => settings.ieffmax.is_active(),
            Gate::SoilMoisture => settings.isoil.is_active(),
            Gate::Never => false,
        }
    }
}

/// Components every dataset must list regardless of switches.
const CORE: &[ComponentId] = &[
    ComponentId::Control,
    ComponentId::RiverNetwork,
    ComponentId::StreamGageStations,
    ComponentId::DiversionStations,
    ComponentId::DiversionRights,
    ComponentId::StreamGageNaturalFlowTsMonthly,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    visible: [bool; COMPONENT_COUNT],
    required: [bool; COMPONENT_COUNT],
}

impl Visibility {
    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.visible[id.index()]
    }

    /// Visible and mandatory: a missing file is worth a warning.
    pub fn is_required(&self, id: ComponentId) -> bool {
        self.required[id.index()]
    }
}

pub fn compute_visibility(settings: &ControlSettings) -> Visibility {
    let mut visible = [false; COMPONENT_COUNT];
    let mut required = [false; COMPONENT_COUNT];

    for desc in catalog::descriptors().iter().filter(|desc| !desc.is_group) {
        let index = desc.id.index();
        visible[index] = desc.gates.iter().all(|gate| gate.is_open(settings));
        required[index] = visible[index]
            && if desc.gates.is_empty() {
                CORE.contains(&desc.id)
            } else {
                desc.gates.iter().all(|gate| gate.is_active(settings))
            };
    }

    for desc in catalog::descriptors().iter().filter(|desc| desc.is_group) {
        visible[desc.id.index()] = catalog::children_of(desc.id)
            .into_iter()
            .any(|child| visible[child.index()]);
    }

    Visibility { visible, required }
}
