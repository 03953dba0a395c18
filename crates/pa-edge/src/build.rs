use std::collections::HashMap;

use pa_core::{LatticePoint, ProvinceId, Relation};
use pa_grid::ProvinceGrid;

use crate::edge::{Edge, EdgeSet, ScanStats};

type EdgeIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Fixed x-coordinate, varying y.
    Vertical,
    /// Fixed y-coordinate, varying x.
    Horizontal,
}

/// An open run of co-linear unit boundaries sharing one relation. Lives only
/// while the scan can still extend it.
#[derive(Debug, Clone, Copy)]
struct Segment {
    relation: Relation,
    start: u16,
    end: u16,
}

impl Segment {
    fn open(relation: Relation, start: u16) -> Self {
        Self {
            relation,
            start,
            end: start + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeEnd {
    Front,
    Back,
}

/// Inline endpoint entries for one lattice point. Only four unit boundaries
/// can meet at a point, so four slots always suffice.
#[derive(Debug, Clone, Copy, Default)]
struct EndpointSlots {
    len: u8,
    ids: [EdgeIdx; 4],
}

impl EndpointSlots {
    fn push(&mut self, idx: EdgeIdx) {
        debug_assert!(
            (self.len as usize) < self.ids.len(),
            "more than four edge ends meet at one lattice point"
        );
        self.ids[self.len as usize] = idx;
        self.len += 1;
    }

    fn iter(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.ids[..self.len as usize].iter().copied()
    }

    fn remove_one(&mut self, idx: EdgeIdx) {
        let pos = self.ids[..self.len as usize]
            .iter()
            .position(|&slot| slot == idx);
        debug_assert!(pos.is_some(), "endpoint entry to remove not found");
        if let Some(pos) = pos {
            self.len -= 1;
            self.ids[pos] = self.ids[self.len as usize];
        }
    }

    fn redirect(&mut self, from: EdgeIdx, to: EdgeIdx) {
        for slot in &mut self.ids[..self.len as usize] {
            if *slot == from {
                *slot = to;
                return;
            }
        }
        debug_assert!(false, "endpoint entry to redirect not found");
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Accumulates scanned segments as two-knot edges and welds them into
/// maximal polylines through their shared endpoints.
#[derive(Debug, Default)]
struct Joiner {
    /// Dense edge table; consumed edges leave a vacated slot until the final
    /// compaction so indices stay stable.
    edges: Vec<Option<Edge>>,
    endpoints: HashMap<LatticePoint, EndpointSlots>,
    stats: ScanStats,
}

impl Joiner {
    fn add_edge(&mut self, relation: Relation, a: LatticePoint, b: LatticePoint) {
        let idx = self.edges.len();
        self.edges.push(Some(Edge::from_segment(relation, a, b)));
        self.endpoints.entry(a).or_default().push(idx);
        self.endpoints.entry(b).or_default().push(idx);
    }

    fn finish_segment(&mut self, axis: Axis, fixed: u16, seg: Segment) {
        let (a, b) = match axis {
            Axis::Vertical => (
                LatticePoint::new(fixed, seg.start),
                LatticePoint::new(fixed, seg.end),
            ),
            Axis::Horizontal => (
                LatticePoint::new(seg.start, fixed),
                LatticePoint::new(seg.end, fixed),
            ),
        };

        let units = (seg.end - seg.start) as usize;
        self.stats.segments += 1;
        self.stats.unit_edges += units;
        self.stats.knots_saved += units - 1;

        self.add_edge(seg.relation, a, b);
    }

    fn join(mut self) -> EdgeSet {
        for idx in 0..self.edges.len() {
            if self.edges[idx].is_none() {
                continue; // consumed by an earlier trace
            }
            self.trace_end(idx, EdgeEnd::Front);
            self.trace_end(idx, EdgeEnd::Back);
        }

        let edges: Vec<Edge> = self.edges.into_iter().flatten().collect();
        EdgeSet::from_parts(edges, self.stats)
    }

    /// Repeatedly extends one end of `edge` by consuming its unique join
    /// partner there, until no partner remains.
    ///
    /// At most one partner can exist: an edge sharing this endpoint along
    /// the same axis with the same relation would already have been merged
    /// by the scan, and the two perpendicular candidates cannot share a
    /// relation with each other for the same reason. Each iteration
    /// destroys one edge, so the loop terminates.
    fn trace_end(&mut self, idx: EdgeIdx, end: EdgeEnd) {
        loop {
            let edge = self.edges[idx].as_ref().expect("traced edge is live");
            let endpoint = match end {
                EdgeEnd::Front => edge.front(),
                EdgeEnd::Back => edge.back(),
            };
            let relation = edge.relation();

            let Some(slots) = self.endpoints.get(&endpoint) else {
                debug_assert!(false, "live edge endpoint missing from the multimap");
                return;
            };

            let mut partner = None;
            for other_idx in slots.iter() {
                if other_idx == idx {
                    continue;
                }
                let other = self.edges[other_idx]
                    .as_ref()
                    .expect("endpoint map entry points at a vacated edge");
                if other.relation() == relation {
                    debug_assert!(
                        partner.is_none(),
                        "two join partners share endpoint {endpoint} and relation {relation}"
                    );
                    partner = Some(other_idx);
                }
            }
            let Some(other_idx) = partner else {
                return;
            };

            // Both entries at the shared endpoint are obsolete.
            let slots = self.endpoints.get_mut(&endpoint).expect("present above");
            slots.remove_one(idx);
            slots.remove_one(other_idx);
            if slots.is_empty() {
                self.endpoints.remove(&endpoint);
            }

            let other = self.edges[other_idx].take().expect("partner is live");
            let edge = self.edges[idx].as_mut().expect("traced edge is live");
            match end {
                EdgeEnd::Front => edge.append_front(&other),
                EdgeEnd::Back => edge.append_back(&other),
            }
            let grown_end = match end {
                EdgeEnd::Front => edge.front(),
                EdgeEnd::Back => edge.back(),
            };

            // The consumed edge's far endpoint entry still points at it;
            // that end of the polyline is ours now.
            self.endpoints
                .get_mut(&grown_end)
                .expect("far endpoint of consumed edge missing from the multimap")
                .redirect(other_idx, idx);
        }
    }
}

/// Extracts every maximal paraxial border polyline of the grid.
///
/// One pass visits cells in row-major order. At each cell the unit boundary
/// toward the right neighbor extends or finishes that boundary column's open
/// vertical segment, and the unit boundary toward the cell above does the
/// same for the single open horizontal segment of the lattice row overhead.
/// Like neighbors close the open segment, so a segment is always one
/// contiguous run of one relation. Finished segments become two-knot edges;
/// the joiner then welds them into maximal polylines.
///
/// Boundaries along the grid's outer border are not emitted. A grid with no
/// unlike neighbors yields an empty set. The result is a pure function of
/// the grid: rebuilding yields the same edges in the same order.
pub fn build_edge_set(grid: &ProvinceGrid) -> EdgeSet {
    let width = grid.width();
    let height = grid.height();

    let mut joiner = Joiner::default();
    let mut vertical: Vec<Option<Segment>> = vec![None; width - 1];
    let mut horizontal: Option<Segment> = None;

    for y in 0..height {
        for x in 0..width {
            let id = grid.get(x, y);

            if x + 1 < width {
                let relation = relation_between(id, grid.get(x + 1, y));
                step(
                    &mut joiner,
                    &mut vertical[x],
                    Axis::Vertical,
                    (x + 1) as u16,
                    relation,
                    y as u16,
                );
            }
            if y > 0 {
                let relation = relation_between(grid.get(x, y - 1), id);
                step(
                    &mut joiner,
                    &mut horizontal,
                    Axis::Horizontal,
                    y as u16,
                    relation,
                    x as u16,
                );
            }
        }

        if let Some(seg) = horizontal.take() {
            joiner.finish_segment(Axis::Horizontal, y as u16, seg);
        }
    }

    for (x, slot) in vertical.iter_mut().enumerate() {
        if let Some(seg) = slot.take() {
            joiner.finish_segment(Axis::Vertical, (x + 1) as u16, seg);
        }
    }

    joiner.join()
}

fn relation_between(a: ProvinceId, b: ProvinceId) -> Option<Relation> {
    (a != b).then(|| Relation::new(a, b))
}

/// One application of the extension rule to an open-segment slot.
fn step(
    joiner: &mut Joiner,
    slot: &mut Option<Segment>,
    axis: Axis,
    fixed: u16,
    relation: Option<Relation>,
    coord: u16,
) {
    if let Some(seg) = slot {
        if relation == Some(seg.relation) {
            seg.end = coord + 1;
            return;
        }
        joiner.finish_segment(axis, fixed, *seg);
        *slot = None;
    }
    if let Some(relation) = relation {
        *slot = Some(Segment::open(relation, coord));
    }
}
