use petmap_core::Category;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add(u32, MarkerKind),
    Remove(u32),
    Fit,
    Zoom(u8),
    Pan,
}

/// Records every call. `fit_bounds` zooms in as far as a real widget would
/// for a tight box, so the clamp is observable.
struct RecordingMap {
    next: u32,
    live: HashSet<u32>,
    zoom: u8,
    ops: Vec<Op>,
}

impl RecordingMap {
    fn new() -> Self {
        Self {
            next: 0,
            live: HashSet::new(),
            zoom: 0,
            ops: Vec::new(),
        }
    }
}

impl MapProvider for RecordingMap {
    type Marker = u32;

    fn add_marker(&mut self, _position: Coordinate, kind: MarkerKind) -> u32 {
        self.next += 1;
        self.live.insert(self.next);
        self.ops.push(Op::Add(self.next, kind));
        self.next
    }

    fn remove_marker(&mut self, marker: u32) {
        assert!(self.live.remove(&marker), "removed unknown marker {marker}");
        self.ops.push(Op::Remove(marker));
    }

    fn fit_bounds(&mut self, _bounds: &Bounds) {
        self.zoom = 21;
        self.ops.push(Op::Fit);
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
        self.ops.push(Op::Zoom(zoom));
    }

    fn pan_to(&mut self, _center: Coordinate) {
        self.ops.push(Op::Pan);
    }
}

fn seoul() -> Coordinate {
    Coordinate::new(37.5665, 126.978).unwrap()
}

fn facility(id: &str, lat: f64, lon: f64) -> Facility {
    Facility::new(
        id,
        format!("facility {id}"),
        Category::Grooming,
        "Gangnam-gu",
        Coordinate::new(lat, lon).unwrap(),
    )
}

fn controller() -> MapController<RecordingMap> {
    MapController::new(RecordingMap::new(), seoul(), 11, 16)
}

#[test]
fn new_moves_to_initial_viewport_and_clamps_zoom() {
    let map = MapController::new(RecordingMap::new(), seoul(), 20, 16);
    assert_eq!(map.view().zoom, 16);
    assert_eq!(map.provider().ops, vec![Op::Pan, Op::Zoom(16)]);
}

#[test]
fn one_marker_per_visible_facility() {
    let mut map = controller();
    let list = vec![
        facility("1", 37.50, 127.02),
        facility("2", 37.51, 127.03),
        facility("3", 37.52, 127.04),
    ];
    let summary = map.reconcile(&list, None);

    assert_eq!(summary.added, 3);
    assert_eq!(map.view().facility_markers.len(), 3);
    assert_eq!(map.provider().live.len(), 3);
}

#[test]
fn markers_do_not_leak_across_updates() {
    let mut map = controller();
    let first = vec![facility("1", 37.50, 127.02), facility("2", 37.51, 127.03)];
    let second = vec![facility("3", 37.52, 127.04)];

    map.reconcile(&first, None);
    map.reconcile(&second, None);

    assert_eq!(map.provider().live.len(), 1);
    assert_eq!(map.view().facility_markers.len(), 1);
    assert!(map.view().facility_markers.contains_key(&FacilityId::from("3")));
}

#[test]
fn all_removals_happen_before_any_addition() {
    let mut map = controller();
    map.reconcile(&[facility("1", 37.50, 127.02), facility("2", 37.51, 127.03)], None);
    let before = map.provider().ops.len();

    map.reconcile(&[facility("3", 37.52, 127.04), facility("4", 37.53, 127.05)], None);
    let ops = &map.provider().ops[before..];

    let last_remove = ops.iter().rposition(|op| matches!(op, Op::Remove(_)));
    let first_add = ops.iter().position(|op| matches!(op, Op::Add(..)));
    assert!(last_remove.unwrap() < first_add.unwrap(), "ops: {ops:?}");
}

#[test]
fn duplicate_facility_ids_render_once() {
    let mut map = controller();
    let list = vec![facility("1", 37.50, 127.02), facility("1", 37.50, 127.02)];
    map.reconcile(&list, None);
    assert_eq!(map.provider().live.len(), 1);
}

#[test]
fn fit_clamps_zoom_to_max_closeness() {
    let mut map = controller();
    let summary = map.reconcile(&[facility("1", 37.50, 127.02)], None);

    assert!(summary.fitted);
    assert_eq!(map.provider().zoom, 16);
    assert_eq!(map.view().zoom, 16);
}

#[test]
fn empty_render_leaves_viewport_untouched() {
    let mut map = controller();
    map.reconcile(&[facility("1", 37.50, 127.02)], None);
    let view_before = map.view().center;
    let zoom_before = map.provider().zoom;
    let ops_before = map.provider().ops.len();

    let summary = map.reconcile(&Vec::<Facility>::new(), None);

    assert!(!summary.fitted);
    assert_eq!(summary.removed, 1);
    assert_eq!(map.view().center, view_before);
    assert_eq!(map.provider().zoom, zoom_before);
    let ops = &map.provider().ops[ops_before..];
    assert!(ops.iter().all(|op| matches!(op, Op::Remove(_))), "ops: {ops:?}");
}

#[test]
fn unchanged_reference_marker_is_kept() {
    let mut map = controller();
    let here = Coordinate::new(37.55, 126.97).unwrap();

    map.reconcile(&[facility("1", 37.50, 127.02)], Some(here));
    let (_, marker) = map.view().reference.unwrap();
    map.reconcile(&[facility("2", 37.51, 127.03)], Some(here));

    assert_eq!(map.view().reference.unwrap().1, marker);
    assert!(map.provider().live.contains(&marker));
    assert_eq!(map.provider().live.len(), 2);
}

#[test]
fn moved_or_cleared_reference_marker_is_replaced() {
    let mut map = controller();
    let here = Coordinate::new(37.55, 126.97).unwrap();
    let there = Coordinate::new(37.60, 127.01).unwrap();

    map.reconcile(&Vec::<Facility>::new(), Some(here));
    let (_, first) = map.view().reference.unwrap();
    map.reconcile(&Vec::<Facility>::new(), Some(there));
    let (at, second) = map.view().reference.unwrap();

    assert_ne!(first, second);
    assert_eq!(at, there);
    assert!(!map.provider().live.contains(&first));

    map.reconcile(&Vec::<Facility>::new(), None);
    assert!(map.view().reference.is_none());
    assert!(map.provider().live.is_empty());
}

#[test]
fn reference_marker_has_its_own_kind() {
    let mut map = controller();
    let here = Coordinate::new(37.55, 126.97).unwrap();
    map.reconcile(&[facility("1", 37.50, 127.02)], Some(here));

    let kinds: Vec<MarkerKind> = map
        .provider()
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Add(_, kind) => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![MarkerKind::Facility, MarkerKind::Reference]);
}

#[test]
fn click_resolves_to_facility_of_current_render() {
    let mut map = controller();
    let here = Coordinate::new(37.55, 126.97).unwrap();
    map.reconcile(&[facility("7", 37.50, 127.02)], Some(here));

    let marker = map.view().facility_markers[&FacilityId::from("7")];
    assert_eq!(map.facility_for(marker), Some(&FacilityId::from("7")));

    let (_, reference) = map.view().reference.unwrap();
    assert_eq!(map.facility_for(reference), None);

    map.reconcile(&[facility("8", 37.51, 127.03)], Some(here));
    assert_eq!(map.facility_for(marker), None);
}
