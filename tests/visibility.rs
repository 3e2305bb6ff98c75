use statemod_dataset::catalog::{self, ComponentId};
use statemod_dataset::control::{ControlSettings, Switch};
use statemod_dataset::visibility::compute_visibility;

use ComponentId as C;

const DAILY: &[ComponentId] = &[
    C::StreamGageHistoricalTsDaily,
    C::StreamGageNaturalFlowTsDaily,
    C::DelayTablesDaily,
    C::DiversionTsDaily,
    C::DemandTsDaily,
    C::ReservoirContentTsDaily,
    C::ReservoirTargetTsDaily,
    C::InstreamDemandTsDaily,
    C::DownstreamCallTsDaily,
];

const WELLS: &[ComponentId] = &[
    C::WellStations,
    C::WellRights,
    C::WellPumpingTsMonthly,
    C::WellDemandTsMonthly,
    C::PlanWellAugmentation,
];

#[test]
fn switches_off_hide_daily_wells_and_san_juan() {
    let settings = ControlSettings {
        iday: Switch::OFF,
        iwell: Switch::OFF,
        isjrip: Switch::OFF,
        ..ControlSettings::default()
    };
    let visibility = compute_visibility(&settings);

    for &id in DAILY.iter().chain(WELLS) {
        assert!(!visibility.is_visible(id), "{id}");
    }
    assert!(!visibility.is_visible(C::SanJuanRecovery));
    assert!(!visibility.is_visible(C::WellGroup));
    assert!(visibility.is_visible(C::StreamGageHistoricalTsMonthly));
    assert!(visibility.is_visible(C::StreamGageGroup));
}

#[test]
fn daily_well_variants_need_both_switches() {
    let mut settings = ControlSettings::default();
    settings.iwell = Switch::new(1);
    assert!(!compute_visibility(&settings).is_visible(C::WellPumpingTsDaily));

    settings.iday = Switch::new(1);
    let visibility = compute_visibility(&settings);
    assert!(visibility.is_visible(C::WellPumpingTsDaily));
    assert!(visibility.is_visible(C::WellDemandTsDaily));
}

#[test]
fn gated_components_follow_their_switch() {
    let mut settings = ControlSettings::default();
    let hidden = compute_visibility(&settings);
    for id in [
        C::InstreamDemandTsMonthly,
        C::IrrigationPracticeTsYearly,
        C::ConsumptiveWaterRequirementTsMonthly,
        C::SoilMoisture,
    ] {
        assert!(!hidden.is_visible(id), "{id}");
    }

    settings.ireach = 3;
    settings.itsfile = Switch::new(-1);
    settings.ieffmax = Switch::new(1);
    settings.isoil = Switch::new(1);
    let shown = compute_visibility(&settings);
    for id in [
        C::InstreamDemandTsMonthly,
        C::IrrigationPracticeTsYearly,
        C::ConsumptiveWaterRequirementTsMonthly,
        C::SoilMoisture,
    ] {
        assert!(shown.is_visible(id), "{id}");
    }
    assert!(!shown.is_visible(C::ConsumptiveWaterRequirementTsDaily));
    assert!(!shown.is_required(C::IrrigationPracticeTsYearly));
    assert!(shown.is_required(C::SoilMoisture));
}

#[test]
fn visibility_is_a_pure_function_of_settings() {
    let mut settings = ControlSettings::default();
    settings.iday = Switch::new(1);
    settings.iwell = Switch::new(-1);
    let first = compute_visibility(&settings);
    let second = compute_visibility(&settings);
    assert_eq!(first, second);
    assert_eq!(first.iter().count(), catalog::COMPONENT_COUNT);
}

#[test]
fn estimate_baseflow_stays_hidden() {
    let settings = ControlSettings {
        iday: Switch::new(1),
        iwell: Switch::new(1),
        isjrip: Switch::new(1),
        itsfile: Switch::new(1),
        ieffmax: Switch::new(1),
        isoil: Switch::new(1),
        ireach: 2,
        ..ControlSettings::default()
    };
    let visibility = compute_visibility(&settings);
    assert!(!visibility.is_visible(C::StreamEstimateNaturalFlowTsMonthly));
    assert!(!visibility.is_visible(C::StreamEstimateNaturalFlowTsDaily));
    let hidden: Vec<_> = catalog::manifest_bearing()
        .filter(|id| !visibility.is_visible(*id))
        .collect();
    assert_eq!(
        hidden,
        vec![C::StreamEstimateNaturalFlowTsMonthly, C::StreamEstimateNaturalFlowTsDaily]
    );
}
