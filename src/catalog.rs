//! Static registry of every dataset component.
//!
//! The catalog is a single table of [`ComponentDescriptor`] records indexed by
//! [`ComponentId`]. Table order is catalog order: it is the order in which the
//! free-form response file is walked and written, and the order of a group's
//! children.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::visibility::Gate;

/// Raw id used by callers for "no component selected".
pub const UNKNOWN_ID: i32 = -1;
/// Raw id used by callers for entries that are not components at all.
pub const NOT_A_COMPONENT_ID: i32 = -2;

pub const COMPONENT_COUNT: usize = 75;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum ComponentId {
    ControlGroup = 0,
    Response = 1,
    Control = 2,
    OutputRequest = 3,
    ReachData = 4,
    StateCuStructure = 5,
    IrrigationPracticeTsYearly = 6,
    ConsumptiveWaterRequirementTsMonthly = 7,
    ConsumptiveWaterRequirementTsDaily = 8,
    SoilMoisture = 9,
    RiverNetworkGroup = 10,
    RiverNetwork = 11,
    Network = 12,
    StreamGageGroup = 13,
    StreamGageStations = 14,
    StreamGageHistoricalTsMonthly = 15,
    StreamGageHistoricalTsDaily = 16,
    StreamGageNaturalFlowTsMonthly = 17,
    StreamGageNaturalFlowTsDaily = 18,
    DelayTableMonthlyGroup = 19,
    DelayTablesMonthly = 20,
    DelayTableDailyGroup = 21,
    DelayTablesDaily = 22,
    DiversionGroup = 23,
    DiversionStations = 24,
    DiversionRights = 25,
    DiversionTsMonthly = 26,
    DiversionTsDaily = 27,
    DemandTsMonthly = 28,
    DemandTsOverrideMonthly = 29,
    DemandTsAverageMonthly = 30,
    DemandTsDaily = 31,
    PrecipitationGroup = 32,
    PrecipitationTsMonthly = 33,
    PrecipitationTsYearly = 34,
    EvaporationGroup = 35,
    EvaporationTsMonthly = 36,
    EvaporationTsYearly = 37,
    ReservoirGroup = 38,
    ReservoirStations = 39,
    ReservoirRights = 40,
    ReservoirContentTsMonthly = 41,
    ReservoirContentTsDaily = 42,
    ReservoirTargetTsMonthly = 43,
    ReservoirTargetTsDaily = 44,
    ReservoirReturn = 45,
    InstreamGroup = 46,
    InstreamStations = 47,
    InstreamRights = 48,
    InstreamDemandTsMonthly = 49,
    InstreamDemandTsAverageMonthly = 50,
    InstreamDemandTsDaily = 51,
    WellGroup = 52,
    WellStations = 53,
    WellRights = 54,
    WellPumpingTsMonthly = 55,
    WellPumpingTsDaily = 56,
    WellDemandTsMonthly = 57,
    WellDemandTsDaily = 58,
    PlanGroup = 59,
    Plans = 60,
    PlanWellAugmentation = 61,
    PlanReturn = 62,
    StreamEstimateGroup = 63,
    StreamEstimateStations = 64,
    StreamEstimateCoefficients = 65,
    StreamEstimateNaturalFlowTsMonthly = 66,
    StreamEstimateNaturalFlowTsDaily = 67,
    OperationGroup = 68,
    OperationalRights = 69,
    DownstreamCallTsDaily = 70,
    SanJuanRecovery = 71,
    RioGrandeSpill = 72,
    SpatialGroup = 73,
    GeoView = 74,
}

impl ComponentId {
    pub fn raw(self) -> i32 {
        self as i32
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static ComponentDescriptor {
        &DESCRIPTORS[self.index()]
    }

    pub fn is_group(self) -> bool {
        self.descriptor().is_group
    }

    /// First component whose manifest key matches, ignoring ASCII case.
    pub fn from_manifest_key(key: &str) -> Option<Self> {
        DESCRIPTORS
            .iter()
            .find(|desc| !desc.manifest_key.is_empty() && desc.manifest_key.eq_ignore_ascii_case(key))
            .map(|desc| desc.id)
    }
}

impl TryFrom<i32> for ComponentId {
    type Error = DatasetError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .ok()
            .and_then(|index| DESCRIPTORS.get(index))
            .map(|desc| desc.id)
            .ok_or(DatasetError::UnknownComponent(raw))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor().display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TsInterval {
    Unknown,
    Day,
    Month,
    Year,
}

impl fmt::Display for TsInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsInterval::Unknown => write!(f, "unknown"),
            TsInterval::Day => write!(f, "day"),
            TsInterval::Month => write!(f, "month"),
            TsInterval::Year => write!(f, "year"),
        }
    }
}

/// Shape of the data a component's file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Groups and the response file itself.
    None,
    Control,
    Stations,
    Rights,
    TimeSeries,
    /// Kept as raw lines; the record format is not interpreted.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    pub id: ComponentId,
    pub display_name: &'static str,
    pub is_group: bool,
    pub group: ComponentId,
    pub extension: &'static str,
    pub manifest_key: &'static str,
    pub ts_data_type: &'static str,
    pub ts_interval: TsInterval,
    pub ts_units: &'static str,
    pub payload: PayloadKind,
    pub gates: &'static [Gate],
    pub alias_of: Option<ComponentId>,
}

impl ComponentDescriptor {
    pub fn is_time_series(&self) -> bool {
        self.payload == PayloadKind::TimeSeries
    }

    /// Components that own a line in a response file.
    pub fn is_manifest_bearing(&self) -> bool {
        !self.is_group && self.id != ComponentId::Response
    }
}

const fn group(id: ComponentId, display_name: &'static str) -> ComponentDescriptor {
    ComponentDescriptor {
        id,
        display_name,
        is_group: true,
        group: id,
        extension: "",
        manifest_key: "",
        ts_data_type: "",
        ts_interval: TsInterval::Unknown,
        ts_units: "",
        payload: PayloadKind::None,
        gates: &[],
        alias_of: None,
    }
}

const fn file(
    id: ComponentId,
    group: ComponentId,
    display_name: &'static str,
    extension: &'static str,
    manifest_key: &'static str,
    payload: PayloadKind,
) -> ComponentDescriptor {
    ComponentDescriptor {
        id,
        display_name,
        is_group: false,
        group,
        extension,
        manifest_key,
        ts_data_type: "",
        ts_interval: TsInterval::Unknown,
        ts_units: "",
        payload,
        gates: &[],
        alias_of: None,
    }
}

const fn series(
    id: ComponentId,
    group: ComponentId,
    display_name: &'static str,
    extension: &'static str,
    manifest_key: &'static str,
    ts: (&'static str, TsInterval, &'static str),
) -> ComponentDescriptor {
    let mut desc = file(
        id,
        group,
        display_name,
        extension,
        manifest_key,
        PayloadKind::TimeSeries,
    );
    desc.ts_data_type = ts.0;
    desc.ts_interval = ts.1;
    desc.ts_units = ts.2;
    desc
}

impl ComponentDescriptor {
    const fn gated(mut self, gates: &'static [Gate]) -> Self {
        self.gates = gates;
        self
    }

    const fn shares(mut self, source: ComponentId) -> Self {
        self.alias_of = Some(source);
        self
    }

    const fn raw_payload(mut self) -> Self {
        self.payload = PayloadKind::Raw;
        self
    }
}

use ComponentId as C;
use PayloadKind as P;
use TsInterval::{Day, Month, Year};

const DAILY: &[Gate] = &[Gate::Daily];
const WELLS: &[Gate] = &[Gate::Wells];
const DAILY_WELLS: &[Gate] = &[Gate::Wells, Gate::Daily];

static DESCRIPTORS: [ComponentDescriptor; COMPONENT_COUNT] = [
    group(C::ControlGroup, "Control Data"),
    file(C::Response, C::ControlGroup, "Response", "rsp", "", P::None),
    file(C::Control, C::ControlGroup, "Control", "ctl", "Control", P::Control),
    file(C::OutputRequest, C::ControlGroup, "Output Request", "out", "OutputRequest", P::Raw),
    file(C::ReachData, C::ControlGroup, "Reach Data", "rch", "Reach_Data", P::Raw),
    file(C::StateCuStructure, C::ControlGroup, "StateCU Structure", "str", "StateCU_Structure", P::Raw),
    series(
        C::IrrigationPracticeTsYearly,
        C::ControlGroup,
        "Irrigation Practice TS (Yearly)",
        "ipy",
        "IrrigationPractice_Yearly",
        ("IrrigationPractice", Year, ""),
    )
    .raw_payload()
    .gated(&[Gate::IrrigationPractice]),
    series(
        C::ConsumptiveWaterRequirementTsMonthly,
        C::ControlGroup,
        "Consumptive Water Requirement (Monthly)",
        "iwr",
        "ConsumptiveWaterRequirement_Monthly",
        ("CWR", Month, "ACFT"),
    )
    .gated(&[Gate::VariableEfficiency]),
    series(
        C::ConsumptiveWaterRequirementTsDaily,
        C::ControlGroup,
        "Consumptive Water Requirement (Daily)",
        "iwd",
        "ConsumptiveWaterRequirement_Daily",
        ("CWR", Day, "CFS"),
    )
    .gated(&[Gate::VariableEfficiency, Gate::Daily]),
    file(C::SoilMoisture, C::ControlGroup, "Soil Moisture", "par", "SoilMoisture", P::Raw)
        .gated(&[Gate::SoilMoisture]),
    group(C::RiverNetworkGroup, "River Network Data"),
    file(C::RiverNetwork, C::RiverNetworkGroup, "River Network", "rin", "River_Network", P::Raw),
    file(C::Network, C::RiverNetworkGroup, "Network (Graphical)", "net", "Network", P::Raw),
    group(C::StreamGageGroup, "Stream Gage Data"),
    file(
        C::StreamGageStations,
        C::StreamGageGroup,
        "Stream Gage Stations",
        "ris",
        "StreamGage_Station",
        P::Stations,
    ),
    series(
        C::StreamGageHistoricalTsMonthly,
        C::StreamGageGroup,
        "Stream Gage Historical TS (Monthly)",
        "rih",
        "StreamGage_Historic_Monthly",
        ("FlowHist", Month, "ACFT"),
    ),
    series(
        C::StreamGageHistoricalTsDaily,
        C::StreamGageGroup,
        "Stream Gage Historical TS (Daily)",
        "riy",
        "StreamGage_Historic_Daily",
        ("FlowHist", Day, "CFS"),
    )
    .gated(DAILY),
    series(
        C::StreamGageNaturalFlowTsMonthly,
        C::StreamGageGroup,
        "Stream Gage Natural Flow TS (Monthly)",
        "rim",
        "Stream_Base_Monthly",
        ("FlowNatural", Month, "ACFT"),
    ),
    series(
        C::StreamGageNaturalFlowTsDaily,
        C::StreamGageGroup,
        "Stream Gage Natural Flow TS (Daily)",
        "rid",
        "Stream_Base_Daily",
        ("FlowNatural", Day, "CFS"),
    )
    .gated(DAILY),
    group(C::DelayTableMonthlyGroup, "Delay Table (Monthly) Data"),
    file(
        C::DelayTablesMonthly,
        C::DelayTableMonthlyGroup,
        "Delay Tables (Monthly)",
        "dly",
        "DelayTable_Monthly",
        P::Raw,
    ),
    group(C::DelayTableDailyGroup, "Delay Table (Daily) Data"),
    file(
        C::DelayTablesDaily,
        C::DelayTableDailyGroup,
        "Delay Tables (Daily)",
        "dld",
        "DelayTable_Daily",
        P::Raw,
    )
    .gated(DAILY),
    group(C::DiversionGroup, "Diversion Data"),
    file(
        C::DiversionStations,
        C::DiversionGroup,
        "Diversion Stations",
        "dds",
        "Diversion_Station",
        P::Stations,
    ),
    file(
        C::DiversionRights,
        C::DiversionGroup,
        "Diversion Rights",
        "ddr",
        "Diversion_Right",
        P::Rights,
    ),
    series(
        C::DiversionTsMonthly,
        C::DiversionGroup,
        "Diversion Historical TS (Monthly)",
        "ddh",
        "Diversion_Historic_Monthly",
        ("DiversionHist", Month, "ACFT"),
    ),
    series(
        C::DiversionTsDaily,
        C::DiversionGroup,
        "Diversion Historical TS (Daily)",
        "ddy",
        "Diversion_Historic_Daily",
        ("DiversionHist", Day, "CFS"),
    )
    .gated(DAILY),
    series(
        C::DemandTsMonthly,
        C::DiversionGroup,
        "Diversion Demand TS (Monthly)",
        "ddm",
        "Diversion_Demand_Monthly",
        ("Demand", Month, "ACFT"),
    ),
    series(
        C::DemandTsOverrideMonthly,
        C::DiversionGroup,
        "Diversion Demand TS Override (Monthly)",
        "ddo",
        "Diversion_DemandOverride_Monthly",
        ("DemandOverride", Month, "ACFT"),
    ),
    series(
        C::DemandTsAverageMonthly,
        C::DiversionGroup,
        "Diversion Demand TS (Average Monthly)",
        "dda",
        "Diversion_Demand_AverageMonthly",
        ("DemandAverage", Month, "ACFT"),
    ),
    series(
        C::DemandTsDaily,
        C::DiversionGroup,
        "Diversion Demand TS (Daily)",
        "ddd",
        "Diversion_Demand_Daily",
        ("Demand", Day, "CFS"),
    )
    .gated(DAILY),
    group(C::PrecipitationGroup, "Precipitation Data"),
    series(
        C::PrecipitationTsMonthly,
        C::PrecipitationGroup,
        "Precipitation Time Series (Monthly)",
        "pre",
        "Precipitation_Monthly",
        ("Precipitation", Month, "IN"),
    ),
    series(
        C::PrecipitationTsYearly,
        C::PrecipitationGroup,
        "Precipitation Time Series (Yearly)",
        "pra",
        "Precipitation_Annual",
        ("Precipitation", Year, "IN"),
    ),
    group(C::EvaporationGroup, "Evaporation Data"),
    series(
        C::EvaporationTsMonthly,
        C::EvaporationGroup,
        "Evaporation Time Series (Monthly)",
        "eva",
        "Evaporation_Monthly",
        ("Evaporation", Month, "IN"),
    ),
    series(
        C::EvaporationTsYearly,
        C::EvaporationGroup,
        "Evaporation Time Series (Yearly)",
        "eya",
        "Evaporation_Annual",
        ("Evaporation", Year, "IN"),
    ),
    group(C::ReservoirGroup, "Reservoir Data"),
    file(
        C::ReservoirStations,
        C::ReservoirGroup,
        "Reservoir Stations",
        "res",
        "Reservoir_Station",
        P::Stations,
    ),
    file(
        C::ReservoirRights,
        C::ReservoirGroup,
        "Reservoir Rights",
        "rer",
        "Reservoir_Right",
        P::Rights,
    ),
    series(
        C::ReservoirContentTsMonthly,
        C::ReservoirGroup,
        "Reservoir Content TS, End of Month (Monthly)",
        "eom",
        "Reservoir_Historic_Monthly",
        ("ContentEOM", Month, "ACFT"),
    ),
    series(
        C::ReservoirContentTsDaily,
        C::ReservoirGroup,
        "Reservoir Content TS, End of Day (Daily)",
        "eoy",
        "Reservoir_Historic_Daily",
        ("ContentEOM", Day, "ACFT"),
    )
    .gated(DAILY),
    series(
        C::ReservoirTargetTsMonthly,
        C::ReservoirGroup,
        "Reservoir Target TS (Monthly)",
        "tar",
        "Reservoir_Target_Monthly",
        ("Target", Month, "ACFT"),
    ),
    series(
        C::ReservoirTargetTsDaily,
        C::ReservoirGroup,
        "Reservoir Target TS (Daily)",
        "tad",
        "Reservoir_Target_Daily",
        ("Target", Day, "ACFT"),
    )
    .gated(DAILY),
    file(
        C::ReservoirReturn,
        C::ReservoirGroup,
        "Reservoir Return Flow",
        "rrf",
        "Reservoir_Return",
        P::Raw,
    ),
    group(C::InstreamGroup, "Instream Flow Data"),
    file(
        C::InstreamStations,
        C::InstreamGroup,
        "Instream Flow Stations",
        "ifs",
        "Instreamflow_Station",
        P::Stations,
    ),
    file(
        C::InstreamRights,
        C::InstreamGroup,
        "Instream Flow Rights",
        "ifr",
        "Instreamflow_Right",
        P::Rights,
    ),
    series(
        C::InstreamDemandTsMonthly,
        C::InstreamGroup,
        "Instream Flow Demand TS (Monthly)",
        "ifm",
        "Instreamflow_Demand_Monthly",
        ("Demand", Month, "ACFT"),
    )
    .gated(&[Gate::ReachInstream]),
    series(
        C::InstreamDemandTsAverageMonthly,
        C::InstreamGroup,
        "Instream Flow Demand TS (Average Monthly)",
        "ifa",
        "Instreamflow_Demand_AverageMonthly",
        ("DemandAverage", Month, "CFS"),
    ),
    series(
        C::InstreamDemandTsDaily,
        C::InstreamGroup,
        "Instream Flow Demand TS (Daily)",
        "ifd",
        "Instreamflow_Demand_Daily",
        ("Demand", Day, "CFS"),
    )
    .gated(DAILY),
    group(C::WellGroup, "Well Data"),
    file(
        C::WellStations,
        C::WellGroup,
        "Well Stations",
        "wes",
        "Well_Station",
        P::Stations,
    )
    .gated(WELLS),
    file(C::WellRights, C::WellGroup, "Well Rights", "wer", "Well_Right", P::Rights).gated(WELLS),
    series(
        C::WellPumpingTsMonthly,
        C::WellGroup,
        "Well Historical Pumping TS (Monthly)",
        "weh",
        "Well_Historic_Monthly",
        ("PumpingHist", Month, "ACFT"),
    )
    .gated(WELLS),
    series(
        C::WellPumpingTsDaily,
        C::WellGroup,
        "Well Historical Pumping TS (Daily)",
        "wey",
        "Well_Historic_Daily",
        ("PumpingHist", Day, "CFS"),
    )
    .gated(DAILY_WELLS),
    series(
        C::WellDemandTsMonthly,
        C::WellGroup,
        "Well Demand TS (Monthly)",
        "wem",
        "Well_Demand_Monthly",
        ("Demand", Month, "ACFT"),
    )
    .gated(WELLS),
    series(
        C::WellDemandTsDaily,
        C::WellGroup,
        "Well Demand TS (Daily)",
        "wed",
        "Well_Demand_Daily",
        ("Demand", Day, "CFS"),
    )
    .gated(DAILY_WELLS),
    group(C::PlanGroup, "Plan Data"),
    file(C::Plans, C::PlanGroup, "Plans", "pln", "Plan_Data", P::Stations),
    file(
        C::PlanWellAugmentation,
        C::PlanGroup,
        "Plan Well Augmentation Data",
        "plw",
        "Plan_Wells",
        P::Raw,
    )
    .gated(WELLS),
    file(C::PlanReturn, C::PlanGroup, "Plan Return Flow", "prf", "Plan_Return", P::Raw),
    group(C::StreamEstimateGroup, "Stream Estimate Data"),
    file(
        C::StreamEstimateStations,
        C::StreamEstimateGroup,
        "Stream Estimate Stations",
        "ses",
        "StreamEstimate_Station",
        P::Stations,
    ),
    file(
        C::StreamEstimateCoefficients,
        C::StreamEstimateGroup,
        "Stream Estimate Coefficients",
        "rib",
        "StreamEstimate_Coefficients",
        P::Raw,
    ),
    series(
        C::StreamEstimateNaturalFlowTsMonthly,
        C::StreamEstimateGroup,
        "Stream Estimate Natural Flow TS (Monthly)",
        "rim",
        "Stream_Base_Monthly",
        ("FlowNatural", Month, "ACFT"),
    )
    .gated(&[Gate::Never])
    .shares(C::StreamGageNaturalFlowTsMonthly),
    series(
        C::StreamEstimateNaturalFlowTsDaily,
        C::StreamEstimateGroup,
        "Stream Estimate Natural Flow TS (Daily)",
        "rid",
        "Stream_Base_Daily",
        ("FlowNatural", Day, "CFS"),
    )
    .gated(&[Gate::Never])
    .shares(C::StreamGageNaturalFlowTsDaily),
    group(C::OperationGroup, "Operational Data"),
    file(
        C::OperationalRights,
        C::OperationGroup,
        "Operational Rights",
        "opr",
        "Operational_Right",
        P::Raw,
    ),
    series(
        C::DownstreamCallTsDaily,
        C::OperationGroup,
        "Downstream Call Time Series (Daily)",
        "cal",
        "Downstream_Call",
        ("Call", Day, ""),
    )
    .gated(DAILY),
    file(
        C::SanJuanRecovery,
        C::OperationGroup,
        "San Juan Sediment Recovery Plan",
        "sjr",
        "SanJuanRecovery",
        P::Raw,
    )
    .gated(&[Gate::SanJuan]),
    file(
        C::RioGrandeSpill,
        C::OperationGroup,
        "Rio Grande Spill",
        "rgs",
        "RioGrande_Spill",
        P::Raw,
    ),
    group(C::SpatialGroup, "Spatial Data"),
    file(
        C::GeoView,
        C::SpatialGroup,
        "Spatial Map Project",
        "gvp",
        "GeographicInformation",
        P::Raw,
    ),
];

/// Virtual entries that only name a one-to-many relationship owned by a real
/// component. Ids are `parent * 100 + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SubComponent {
    DiversionStationDelayTables = 2401,
    DiversionStationCollections = 2402,
    ReservoirStationAccounts = 3901,
    ReservoirStationPrecipStations = 3902,
    ReservoirStationEvapStations = 3903,
    ReservoirStationCurve = 3904,
    ReservoirStationCollections = 3905,
    WellStationDelayTables = 5301,
    WellStationDepletionTables = 5302,
    WellStationCollections = 5303,
}

impl SubComponent {
    pub const ALL: [SubComponent; 10] = [
        SubComponent::DiversionStationDelayTables,
        SubComponent::DiversionStationCollections,
        SubComponent::ReservoirStationAccounts,
        SubComponent::ReservoirStationPrecipStations,
        SubComponent::ReservoirStationEvapStations,
        SubComponent::ReservoirStationCurve,
        SubComponent::ReservoirStationCollections,
        SubComponent::WellStationDelayTables,
        SubComponent::WellStationDepletionTables,
        SubComponent::WellStationCollections,
    ];

    pub fn raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|sub| sub.raw() == raw)
    }

    pub fn parent(self) -> ComponentId {
        match self {
            SubComponent::DiversionStationDelayTables | SubComponent::DiversionStationCollections => {
                ComponentId::DiversionStations
            }
            SubComponent::ReservoirStationAccounts
            | SubComponent::ReservoirStationPrecipStations
            | SubComponent::ReservoirStationEvapStations
            | SubComponent::ReservoirStationCurve
            | SubComponent::ReservoirStationCollections => ComponentId::ReservoirStations,
            SubComponent::WellStationDelayTables
            | SubComponent::WellStationDepletionTables
            | SubComponent::WellStationCollections => ComponentId::WellStations,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SubComponent::DiversionStationDelayTables => "Diversion Station Delay Table Assignment",
            SubComponent::DiversionStationCollections => "Diversion Station Collection Parts",
            SubComponent::ReservoirStationAccounts => "Reservoir Station Accounts",
            SubComponent::ReservoirStationPrecipStations => "Reservoir Station Precipitation Stations",
            SubComponent::ReservoirStationEvapStations => "Reservoir Station Evaporation Stations",
            SubComponent::ReservoirStationCurve => "Reservoir Station Content/Area/Seepage",
            SubComponent::ReservoirStationCollections => "Reservoir Station Collection Parts",
            SubComponent::WellStationDelayTables => "Well Station Delay Table Assignment",
            SubComponent::WellStationDepletionTables => "Well Station Depletion Table Assignment",
            SubComponent::WellStationCollections => "Well Station Collection Parts",
        }
    }
}

pub fn describe(id: ComponentId) -> &'static ComponentDescriptor {
    id.descriptor()
}

/// Looks up a descriptor by raw id. Sentinels and out-of-range ids fail.
pub fn describe_raw(raw: i32) -> Result<&'static ComponentDescriptor, DatasetError> {
    ComponentId::try_from(raw).map(describe)
}

pub fn descriptors() -> &'static [ComponentDescriptor] {
    &DESCRIPTORS
}

pub fn all_ids() -> impl Iterator<Item = ComponentId> {
    DESCRIPTORS.iter().map(|desc| desc.id)
}

pub fn manifest_bearing() -> impl Iterator<Item = ComponentId> {
    DESCRIPTORS
        .iter()
        .filter(|desc| desc.is_manifest_bearing())
        .map(|desc| desc.id)
}

pub fn group_of(id: ComponentId) -> ComponentId {
    id.descriptor().group
}

pub fn children_of(group: ComponentId) -> Vec<ComponentId> {
    DESCRIPTORS
        .iter()
        .filter(|desc| !desc.is_group && desc.group == group)
        .map(|desc| desc.id)
        .collect()
}

/// Display label for a component or sub-component raw id.
pub fn label(raw: i32) -> Result<&'static str, DatasetError> {
    if let Some(sub) = SubComponent::from_raw(raw) {
        return Ok(sub.display_name());
    }
    describe_raw(raw).map(|desc| desc.display_name)
}
