//! Shared response-file types and the legacy positional order.

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::catalog::ComponentId;
use crate::control::ControlSettings;
use crate::visibility::Gate;

/// Marker line ending the comment header carried between rewrites.
pub const HEADER_END_MARKER: &str = "#>EndHeader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Loaded,
    /// The response file does not list the component.
    AbsentByFormat,
    /// Listed, but the file is missing or zero length.
    AbsentEmptyFile,
    SkippedInactive,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub component: ComponentId,
    pub resolved_path: Option<Utf8PathBuf>,
    pub is_shared_alias: bool,
    pub status: EntryStatus,
}

impl ManifestEntry {
    pub fn new(component: ComponentId, status: EntryStatus) -> Self {
        Self {
            component,
            resolved_path: None,
            is_shared_alias: false,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadDiagnostic {
    pub component: ComponentId,
    pub path: Option<Utf8PathBuf>,
    pub severity: Severity,
    pub message: String,
}

/// One line of a legacy response file. The line exists only when every gate
/// is open for the dataset's control settings.
#[derive(Debug, Clone, Copy)]
pub struct LegacySlot {
    pub component: ComponentId,
    pub gates: &'static [Gate],
}

impl LegacySlot {
    pub fn is_present(&self, settings: &ControlSettings) -> bool {
        self.gates.iter().all(|gate| gate.is_open(settings))
    }
}

const fn slot(component: ComponentId, gates: &'static [Gate]) -> LegacySlot {
    LegacySlot { component, gates }
}

use ComponentId as C;

const ALWAYS: &[Gate] = &[];
const WELLS: &[Gate] = &[Gate::Wells];
const DAILY: &[Gate] = &[Gate::Daily];
const DAILY_WELLS: &[Gate] = &[Gate::Daily, Gate::Wells];

/// Line order StateMod expects in a legacy response file. This is not
/// catalog order.
pub const LEGACY_ORDER: &[LegacySlot] = &[
    slot(C::Control, ALWAYS),
    slot(C::RiverNetwork, ALWAYS),
    slot(C::ReservoirStations, ALWAYS),
    slot(C::DiversionStations, ALWAYS),
    slot(C::StreamGageStations, ALWAYS),
    slot(C::InstreamStations, ALWAYS),
    slot(C::WellStations, WELLS),
    slot(C::InstreamRights, ALWAYS),
    slot(C::ReservoirRights, ALWAYS),
    slot(C::DiversionRights, ALWAYS),
    slot(C::OperationalRights, ALWAYS),
    slot(C::WellRights, WELLS),
    slot(C::PrecipitationTsMonthly, ALWAYS),
    slot(C::EvaporationTsMonthly, ALWAYS),
    slot(C::StreamGageNaturalFlowTsMonthly, ALWAYS),
    slot(C::DemandTsMonthly, ALWAYS),
    slot(C::DemandTsAverageMonthly, ALWAYS),
    slot(C::InstreamDemandTsAverageMonthly, ALWAYS),
    slot(C::InstreamDemandTsMonthly, ALWAYS),
    slot(C::WellDemandTsMonthly, WELLS),
    slot(C::DelayTablesMonthly, ALWAYS),
    slot(C::ReservoirTargetTsMonthly, ALWAYS),
    slot(C::StreamEstimateCoefficients, ALWAYS),
    slot(C::StreamGageHistoricalTsMonthly, ALWAYS),
    slot(C::DiversionTsMonthly, ALWAYS),
    slot(C::WellPumpingTsMonthly, WELLS),
    slot(C::ReservoirContentTsMonthly, ALWAYS),
    slot(C::GeoView, ALWAYS),
    slot(C::OutputRequest, ALWAYS),
    slot(C::StreamGageNaturalFlowTsDaily, DAILY),
    slot(C::DemandTsDaily, DAILY),
    slot(C::InstreamDemandTsDaily, DAILY),
    slot(C::WellDemandTsDaily, DAILY_WELLS),
    slot(C::ReservoirTargetTsDaily, DAILY),
    slot(C::DelayTablesDaily, DAILY),
    slot(C::StreamGageHistoricalTsDaily, DAILY),
    slot(C::DiversionTsDaily, DAILY),
    slot(C::WellPumpingTsDaily, DAILY_WELLS),
    slot(C::ReservoirContentTsDaily, DAILY),
    slot(C::SanJuanRecovery, &[Gate::SanJuan]),
    slot(C::IrrigationPracticeTsYearly, &[Gate::IrrigationPractice]),
    slot(C::ConsumptiveWaterRequirementTsMonthly, &[Gate::VariableEfficiency]),
    slot(
        C::ConsumptiveWaterRequirementTsDaily,
        &[Gate::VariableEfficiency, Gate::Daily],
    ),
    slot(C::SoilMoisture, &[Gate::SoilMoisture]),
];

/// Slots a legacy file carries for these settings, in line order.
pub fn legacy_slots(settings: &ControlSettings) -> impl Iterator<Item = &'static LegacySlot> + '_ {
    LEGACY_ORDER.iter().filter(|slot| slot.is_present(settings))
}
