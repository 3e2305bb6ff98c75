use assert_matches::assert_matches;

use statemod_dataset::catalog::{
    self, ComponentId, NOT_A_COMPONENT_ID, SubComponent, TsInterval, UNKNOWN_ID,
};
use statemod_dataset::error::DatasetError;

#[test]
fn every_component_has_one_group() {
    for desc in catalog::descriptors() {
        let group = catalog::group_of(desc.id);
        assert!(group.is_group(), "{}", desc.display_name);
        if desc.is_group {
            assert_eq!(group, desc.id);
            assert!(desc.manifest_key.is_empty());
        } else {
            assert!(catalog::children_of(group).contains(&desc.id));
        }
    }
}

#[test]
fn ids_round_trip_through_raw_values() {
    for id in catalog::all_ids() {
        assert_eq!(ComponentId::try_from(id.raw()).unwrap(), id);
    }
    assert_eq!(catalog::all_ids().count(), catalog::COMPONENT_COUNT);
}

#[test]
fn sentinels_and_out_of_range_ids_are_rejected() {
    assert_matches!(catalog::describe_raw(UNKNOWN_ID), Err(DatasetError::UnknownComponent(-1)));
    assert_matches!(
        catalog::describe_raw(NOT_A_COMPONENT_ID),
        Err(DatasetError::UnknownComponent(-2))
    );
    assert_matches!(catalog::describe_raw(75), Err(DatasetError::UnknownComponent(75)));
    assert!(catalog::label(9999).is_err());
}

#[test]
fn describe_carries_series_metadata() {
    let desc = catalog::describe(ComponentId::DiversionTsMonthly);
    assert_eq!(desc.extension, "ddh");
    assert_eq!(desc.manifest_key, "Diversion_Historic_Monthly");
    assert_eq!(desc.ts_interval, TsInterval::Month);
    assert!(desc.is_time_series());

    let daily = catalog::describe(ComponentId::StreamGageNaturalFlowTsDaily);
    assert_eq!(daily.ts_interval, TsInterval::Day);
    assert_eq!(daily.ts_units, "CFS");
}

#[test]
fn children_follow_catalog_order() {
    assert_eq!(
        catalog::children_of(ComponentId::StreamEstimateGroup),
        vec![
            ComponentId::StreamEstimateStations,
            ComponentId::StreamEstimateCoefficients,
            ComponentId::StreamEstimateNaturalFlowTsMonthly,
            ComponentId::StreamEstimateNaturalFlowTsDaily,
        ]
    );
    assert!(catalog::children_of(ComponentId::DiversionStations).is_empty());
}

#[test]
fn manifest_keys_are_unique_except_for_aliases() {
    for desc in catalog::descriptors().iter().filter(|desc| !desc.manifest_key.is_empty()) {
        let owner = ComponentId::from_manifest_key(desc.manifest_key).unwrap();
        match desc.alias_of {
            Some(source) => assert_eq!(owner, source),
            None => assert_eq!(owner, desc.id),
        }
    }
    assert_eq!(
        ComponentId::from_manifest_key("stream_base_monthly"),
        Some(ComponentId::StreamGageNaturalFlowTsMonthly)
    );
    assert_eq!(ComponentId::from_manifest_key("Response"), None);
}

#[test]
fn sub_components_label_but_never_own_files() {
    for sub in SubComponent::ALL {
        assert_eq!(SubComponent::from_raw(sub.raw()), Some(sub));
        assert_eq!(sub.raw() / 100, sub.parent().raw());
        assert_eq!(catalog::label(sub.raw()).unwrap(), sub.display_name());
        assert!(ComponentId::try_from(sub.raw()).is_err());
    }
    assert_eq!(
        catalog::label(2401).unwrap(),
        "Diversion Station Delay Table Assignment"
    );
    assert_eq!(catalog::label(ComponentId::Control.raw()).unwrap(), "Control");
}
