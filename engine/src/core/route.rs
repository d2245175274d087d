//! Straight-line nearest-first visiting order
//!
//! Distances are planar Euclidean in degree space, which is close enough at
//! city scale. Sorting is stable, so equal distances keep input order.

use shared::{ComponentId, ContractRecord, Coordinate, component_debug};

/// Rough kilometres per degree, for display only
pub const KM_PER_DEGREE: f64 = 111.0;

/// Offset applied to the first located record when no agent position is known
const FALLBACK_OFFSET_DEGREES: f64 = -0.01;

/// A record paired with its known position
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub record: &'a ContractRecord,
    pub position: Coordinate,
}

impl<'a> Located<'a> {
    pub fn from_record(record: &'a ContractRecord) -> Option<Self> {
        record.position.map(|position| Self { record, position })
    }
}

/// Order located records by distance from `origin`, nearest first
pub fn optimize<'a>(origin: Coordinate, records: &[Located<'a>]) -> Vec<(&'a ContractRecord, f64)> {
    let mut ranked: Vec<(&'a ContractRecord, f64)> = records
        .iter()
        .map(|located| (located.record, origin.planar_distance(&located.position)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

/// One entry of a route plan
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub record: ContractRecord,
    /// `None` marks an unrankable record (no coordinates)
    pub distance: Option<f64>,
    /// 1-based visiting order, assigned to the first `cap` ranked stops only
    pub visit_order: Option<usize>,
}

impl RouteStop {
    pub fn is_unrankable(&self) -> bool {
        self.distance.is_none()
    }

    pub fn approx_km(&self) -> Option<f64> {
        self.distance.map(|d| d * KM_PER_DEGREE)
    }
}

/// Ranked stops followed by unrankable ones
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub origin: Coordinate,
    pub stops: Vec<RouteStop>,
}

impl RoutePlan {
    /// Stops that received a visit number, in visiting order
    pub fn numbered(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops.iter().filter(|stop| stop.visit_order.is_some())
    }

    pub fn unrankable(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops.iter().filter(|stop| stop.is_unrankable())
    }

    /// Polyline from the origin through every numbered stop
    pub fn guide_path(&self) -> Vec<Coordinate> {
        std::iter::once(self.origin)
            .chain(self.numbered().filter_map(|stop| stop.record.position))
            .collect()
    }
}

/// Build the full visiting plan for `records`.
///
/// Records without coordinates are appended after every ranked record in
/// their original order. Only the first `cap` ranked stops are numbered.
pub fn plan_route(origin: Coordinate, records: &[ContractRecord], cap: usize) -> RoutePlan {
    let (located, unrankable): (Vec<&ContractRecord>, Vec<&ContractRecord>) =
        records.iter().partition(|record| record.is_located());
    let located: Vec<Located<'_>> = located.into_iter().filter_map(Located::from_record).collect();

    let mut stops: Vec<RouteStop> = optimize(origin, &located)
        .into_iter()
        .enumerate()
        .map(|(index, (record, distance))| RouteStop {
            record: record.clone(),
            distance: Some(distance),
            visit_order: (index < cap).then_some(index + 1),
        })
        .collect();

    stops.extend(unrankable.into_iter().map(|record| RouteStop {
        record: record.clone(),
        distance: None,
        visit_order: None,
    }));

    component_debug!(
        ComponentId::RouteOptimizer,
        "🧭 Planned {} stops from {} ({} unrankable, cap {})",
        stops.len(),
        origin,
        records.len() - located.len(),
        cap
    );

    RoutePlan { origin, stops }
}

/// Deterministic origin when the agent's position is unknown: just south-west
/// of the first located record, or `default` when none is located.
pub fn fallback_origin(records: &[ContractRecord], default: Coordinate) -> Coordinate {
    records
        .iter()
        .find_map(|record| record.position)
        .map(|position| position.offset(FALLBACK_OFFSET_DEGREES))
        .unwrap_or(default)
}
