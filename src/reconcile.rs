//! Links loaded components to each other after a read.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::ComponentId;
use crate::domain::{Payload, Station, StationId};
use crate::format::ManifestFormat;
use crate::store::ComponentStore;

use ComponentId as C;

/// Rights component and the stations it is administered at.
const RIGHT_OWNERS: &[(ComponentId, ComponentId)] = &[
    (C::DiversionRights, C::DiversionStations),
    (C::ReservoirRights, C::ReservoirStations),
    (C::InstreamRights, C::InstreamStations),
    (C::WellRights, C::WellStations),
];

/// Stations component and the time series whose locations are its stations.
const SERIES_OWNERS: &[(ComponentId, &[ComponentId])] = &[
    (
        C::StreamGageStations,
        &[
            C::StreamGageHistoricalTsMonthly,
            C::StreamGageHistoricalTsDaily,
            C::StreamGageNaturalFlowTsMonthly,
            C::StreamGageNaturalFlowTsDaily,
        ],
    ),
    (
        C::StreamEstimateStations,
        &[
            C::StreamEstimateNaturalFlowTsMonthly,
            C::StreamEstimateNaturalFlowTsDaily,
        ],
    ),
    (
        C::DiversionStations,
        &[
            C::DiversionTsMonthly,
            C::DiversionTsDaily,
            C::DemandTsMonthly,
            C::DemandTsOverrideMonthly,
            C::DemandTsAverageMonthly,
            C::DemandTsDaily,
            C::ConsumptiveWaterRequirementTsMonthly,
            C::ConsumptiveWaterRequirementTsDaily,
        ],
    ),
    (
        C::ReservoirStations,
        &[
            C::ReservoirContentTsMonthly,
            C::ReservoirContentTsDaily,
            C::ReservoirTargetTsMonthly,
            C::ReservoirTargetTsDaily,
        ],
    ),
    (
        C::InstreamStations,
        &[
            C::InstreamDemandTsMonthly,
            C::InstreamDemandTsAverageMonthly,
            C::InstreamDemandTsDaily,
        ],
    ),
    (
        C::WellStations,
        &[
            C::WellPumpingTsMonthly,
            C::WellPumpingTsDaily,
            C::WellDemandTsMonthly,
            C::WellDemandTsDaily,
        ],
    ),
];

pub fn reconcile(store: &mut ComponentStore, format: ManifestFormat) {
    if format == ManifestFormat::Legacy {
        split_river_stations(store);
    }
    for &(rights, stations) in RIGHT_OWNERS {
        link_rights(store, rights, stations);
    }
    for &(stations, series) in SERIES_OWNERS {
        for &component in series {
            link_series(store, stations, component);
        }
    }
}

fn station_ids(store: &ComponentStore, id: ComponentId) -> HashSet<StationId> {
    store
        .payload(id)
        .and_then(Payload::stations)
        .map(|stations| stations.iter().map(|station| station.id.clone()).collect())
        .unwrap_or_default()
}

fn series_locations(store: &ComponentStore, id: ComponentId) -> HashSet<StationId> {
    store
        .payload(id)
        .and_then(Payload::time_series)
        .map(|series| series.iter().map(|ts| ts.location.clone()).collect())
        .unwrap_or_default()
}

fn stations_mut(store: &mut ComponentStore, id: ComponentId) -> Option<&mut Vec<Station>> {
    match store.payload_mut(id)? {
        Payload::Stations(stations) => Some(stations),
        _ => None,
    }
}

fn link_rights(store: &mut ComponentStore, rights_id: ComponentId, stations_id: ComponentId) {
    let known = station_ids(store, stations_id);
    let mut owned: Vec<(StationId, String)> = Vec::new();
    if let Some(Payload::Rights(rights)) = store.payload_mut(rights_id) {
        for right in rights.iter_mut() {
            right.linked = known.contains(&right.station);
            if right.linked {
                owned.push((right.station.clone(), right.id.clone()));
            } else {
                debug!(right = %right.id, station = %right.station, "right has no matching station");
            }
        }
    }
    if let Some(stations) = stations_mut(store, stations_id) {
        for station in stations.iter_mut() {
            station.rights = owned
                .iter()
                .filter(|(owner, _)| *owner == station.id)
                .map(|(_, right)| right.clone())
                .collect();
        }
    }
}

fn link_series(store: &mut ComponentStore, stations_id: ComponentId, series_id: ComponentId) {
    let locations = series_locations(store, series_id);
    let known = station_ids(store, stations_id);
    if let Some(stations) = stations_mut(store, stations_id) {
        for station in stations.iter_mut() {
            station.series.retain(|component| *component != series_id);
            if locations.contains(&station.id) {
                station.series.push(series_id);
            }
        }
    }
    // Aliases share one payload; either family owning the location links it.
    if let Some(Payload::TimeSeries(series)) = store.payload_mut(series_id) {
        for ts in series.iter_mut() {
            ts.linked |= known.contains(&ts.location);
        }
    }
}

/// Legacy files list every river station in the stream gage file. Stations
/// without historical flows are estimate stations; they are moved out when
/// no estimate station file supplied them. The split is in memory only: the
/// estimate record gets no file name, so station files are not rewritten.
fn split_river_stations(store: &mut ComponentStore) {
    if store.has_data(C::StreamEstimateStations) || !store.has_data(C::StreamGageStations) {
        return;
    }
    let mut gaged = series_locations(store, C::StreamGageHistoricalTsMonthly);
    gaged.extend(series_locations(store, C::StreamGageHistoricalTsDaily));

    let Some(stations) = stations_mut(store, C::StreamGageStations) else {
        return;
    };
    let (kept, estimated): (Vec<Station>, Vec<Station>) = std::mem::take(stations)
        .into_iter()
        .partition(|station| gaged.contains(&station.id));
    *stations = kept;
    debug!(
        gaged = stations.len(),
        estimated = estimated.len(),
        "split river stations"
    );
    store.set_payload(C::StreamEstimateStations, Some(Payload::Stations(estimated)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TsInterval;
    use crate::domain::{Right, TimeSeries, TsRow};

    fn id(value: &str) -> StationId {
        value.parse().unwrap()
    }

    fn series(location: &str) -> TimeSeries {
        TimeSeries {
            location: id(location),
            data_type: "FlowHist".to_string(),
            units: "ACFT".to_string(),
            interval: TsInterval::Month,
            rows: vec![TsRow {
                year: 1950,
                month: None,
                values: vec![1.0; 12],
            }],
            linked: false,
        }
    }

    #[test]
    fn legacy_split_moves_ungaged_stations() {
        let mut store = ComponentStore::new("/data");
        store.set_payload(
            C::StreamGageStations,
            Some(Payload::Stations(vec![
                Station::new(id("09010500"), "Gage"),
                Station::new(id("0100501_E"), "Estimate"),
            ])),
        );
        store.set_payload(
            C::StreamGageHistoricalTsMonthly,
            Some(Payload::TimeSeries(vec![series("09010500")])),
        );

        reconcile(&mut store, ManifestFormat::Legacy);

        let gaged = store.payload(C::StreamGageStations).and_then(Payload::stations).unwrap();
        let estimated = store
            .payload(C::StreamEstimateStations)
            .and_then(Payload::stations)
            .unwrap();
        assert_eq!(gaged.len(), 1);
        assert!(gaged[0].has_series(C::StreamGageHistoricalTsMonthly));
        assert_eq!(estimated[0].id.as_str(), "0100501_E");
    }

    #[test]
    fn freeform_keeps_river_stations_together() {
        let mut store = ComponentStore::new("/data");
        store.set_payload(
            C::StreamGageStations,
            Some(Payload::Stations(vec![Station::new(id("A"), "A")])),
        );
        reconcile(&mut store, ManifestFormat::Freeform);
        assert!(!store.has_data(C::StreamEstimateStations));
    }

    #[test]
    fn rights_link_to_their_stations() {
        let mut store = ComponentStore::new("/data");
        store.set_payload(
            C::DiversionStations,
            Some(Payload::Stations(vec![Station::new(id("0100501"), "Ditch")])),
        );
        let right = |right_id: &str, station: &str| Right {
            id: right_id.to_string(),
            name: String::new(),
            station: id(station),
            admin_number: 1.0,
            decree: 2.0,
            on_off: 1,
            linked: false,
        };
        store.set_payload(
            C::DiversionRights,
            Some(Payload::Rights(vec![
                right("0100501.01", "0100501"),
                right("9999999.01", "9999999"),
            ])),
        );

        reconcile(&mut store, ManifestFormat::Freeform);

        let rights = store.payload(C::DiversionRights).and_then(Payload::rights).unwrap();
        assert!(rights[0].linked);
        assert!(!rights[1].linked);
        let stations = store.payload(C::DiversionStations).and_then(Payload::stations).unwrap();
        assert_eq!(stations[0].rights, vec!["0100501.01".to_string()]);
    }
}
