//! Zig-zag infill generator.
//!
//! Each island of a fill boundary is rasterized on its own:
//!
//! 1. rotate by `-angle` about the centroid, shrink slightly and take the
//!    bounding box;
//! 2. lay evenly spaced horizontal hatch lines across it and rotate them back;
//! 3. trim every hatch line against the island;
//! 4. group consecutive lines with the same number of trimmed segments;
//! 5. turn each group into one or more candidate lists and stitch them into
//!    serpentine paths (or alternate their directions in non-continuous mode).
//!
//! A group never merges with an earlier one, even if the segment count
//! returns to a previous value after a different one.

use crate::collaborator::GeometryCollaborator;
use crate::region::{bounding_box_of, Point2, Region, Segment2};
use fastrob_core::{Path, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inward shrink applied before measuring the island
pub const HATCH_SHRINK: f64 = 0.1;

/// How far hatch lines extend beyond the bounding box on each side
pub const HATCH_OVERHANG: f64 = 2.0;

/// Trimmed pieces shorter than this are discarded
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Infill parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfillParams {
    /// Raster direction in degrees
    pub angle_deg: f64,
    /// Distance between hatch lines
    pub spacing: f64,
    /// Stitch segments into serpentines instead of emitting them one by one
    pub continuous: bool,
}

impl Default for InfillParams {
    fn default() -> Self {
        Self {
            angle_deg: 45.0,
            spacing: 6.0,
            continuous: true,
        }
    }
}

/// One raster line after trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchLine {
    /// Island the line belongs to
    pub island: usize,
    /// Raster angle in degrees
    pub angle_deg: f64,
    /// Y position in the rotated frame
    pub y: f64,
    /// Untrimmed line in the unrotated frame
    pub segment: Segment2,
    /// Pieces inside the island, ordered along the line
    pub segments: Vec<Segment2>,
}

impl HatchLine {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// A maximal run of hatch lines sharing one segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatchGroup {
    /// Common segment count
    pub count: usize,
    /// Index of the first line of the run
    pub start: usize,
    /// Number of lines in the run
    pub len: usize,
}

impl HatchGroup {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Infill of one shell together with its intermediates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfillResult {
    /// Planar infill polylines in print order
    pub polylines: Vec<Vec<Point2>>,
    /// Every generated hatch line, including the ones that missed the island
    pub hatch_lines: Vec<HatchLine>,
    /// Groups per island, indices refer to that island's non-empty lines
    pub groups: Vec<Vec<HatchGroup>>,
}

impl InfillResult {
    /// Infill paths lifted to height `z`
    pub fn paths(&self, z: f64) -> Vec<Path> {
        self.polylines
            .iter()
            .map(|line| line.iter().map(|p| Point3::new(p.x, p.y, z)).collect())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }
}

/// Split a sequence of segment counts into maximal runs of equal values.
pub fn group_by_count(counts: &[usize]) -> Vec<HatchGroup> {
    let mut groups: Vec<HatchGroup> = Vec::new();
    for (index, &count) in counts.iter().enumerate() {
        match groups.last_mut() {
            Some(group) if group.count == count => group.len += 1,
            _ => groups.push(HatchGroup {
                count,
                start: index,
                len: 1,
            }),
        }
    }
    groups
}

/// Y positions of the hatch lines for a band of height `height` starting at `min_y`.
pub fn hatch_positions(min_y: f64, height: f64, spacing: f64) -> Vec<f64> {
    let count = (height / spacing).round();
    if !count.is_finite() || count < 1.0 {
        return vec![min_y + height / 2.0];
    }
    let count = count as usize;
    let actual_spacing = height / count as f64;
    (0..=count)
        .map(|k| min_y + k as f64 * actual_spacing)
        .collect()
}

/// Rasterizes fill boundaries into zig-zag paths.
pub struct ZigZagInfill<'a, G: GeometryCollaborator + ?Sized> {
    geometry: &'a G,
    params: InfillParams,
}

impl<'a, G: GeometryCollaborator + ?Sized> ZigZagInfill<'a, G> {
    pub fn new(geometry: &'a G, params: InfillParams) -> Self {
        Self { geometry, params }
    }

    pub fn params(&self) -> &InfillParams {
        &self.params
    }

    /// Fill every island of `shell`.
    pub fn generate(&self, shell: &[Region]) -> InfillResult {
        let mut result = InfillResult::default();
        if self.params.spacing <= 0.0 || self.params.spacing.is_nan() {
            warn!("Infill spacing {} is not positive, skipping infill", self.params.spacing);
            return result;
        }

        for (index, island) in shell.iter().enumerate() {
            let lines = self.hatch_island(index, island);
            let filled: Vec<&HatchLine> =
                lines.iter().filter(|l| l.segment_count() > 0).collect();
            let counts: Vec<usize> = filled.iter().map(|l| l.segment_count()).collect();
            let groups = group_by_count(&counts);

            for group in &groups {
                for candidate in self.candidates(&filled, group) {
                    self.stitch(&candidate, &mut result.polylines);
                }
            }

            debug!(
                "Island {}: {} hatch lines, {} with segments, {} groups",
                index,
                lines.len(),
                filled.len(),
                groups.len()
            );
            result.groups.push(groups);
            result.hatch_lines.extend(lines);
        }

        result
    }

    /// Generate and trim the hatch lines of one island.
    fn hatch_island(&self, index: usize, island: &Region) -> Vec<HatchLine> {
        let angle = self.params.angle_deg;
        let centroid = island.centroid();
        let rotated = island.rotated(centroid, -angle);

        let shrunk = match self.geometry.offset(std::slice::from_ref(&rotated), HATCH_SHRINK) {
            Ok(regions) => regions,
            Err(err) => {
                debug!("Island {} vanished under the boundary shrink: {}", index, err);
                return Vec::new();
            }
        };
        let Some(bbox) = bounding_box_of(&shrunk) else {
            return Vec::new();
        };

        hatch_positions(bbox.min_y, bbox.height(), self.params.spacing)
            .into_iter()
            .map(|y| {
                let segment = Segment2::new(
                    Point2::new(bbox.min_x - HATCH_OVERHANG, y),
                    Point2::new(bbox.max_x + HATCH_OVERHANG, y),
                )
                .rotated(centroid, angle);
                let segments = self
                    .geometry
                    .intersect_segment(&segment, island)
                    .into_iter()
                    .filter(|s| s.length() > MIN_SEGMENT_LENGTH)
                    .collect();
                HatchLine {
                    island: index,
                    angle_deg: angle,
                    y,
                    segment,
                    segments,
                }
            })
            .collect()
    }

    /// Candidate lists of one group: a single list for count 1, otherwise one
    /// list per segment slot.
    fn candidates(&self, lines: &[&HatchLine], group: &HatchGroup) -> Vec<Vec<Segment2>> {
        let members = &lines[group.range()];

        if group.count == 1 {
            return vec![members.iter().map(|l| l.segments[0]).collect()];
        }

        // Grouping guarantees every member has exactly `group.count` segments.
        let mut columns: Vec<Vec<Segment2>> = vec![Vec::with_capacity(members.len()); group.count];
        for line in members {
            for (slot, segment) in line.segments.iter().enumerate() {
                columns[slot].push(*segment);
            }
        }
        columns
    }

    /// Turn one candidate list into output polylines.
    fn stitch(&self, candidate: &[Segment2], out: &mut Vec<Vec<Point2>>) {
        if candidate.is_empty() {
            return;
        }

        if self.params.continuous {
            // Odd segments run backwards, so the connectors alternate between
            // end-to-end and start-to-start.
            let mut polyline = Vec::with_capacity(candidate.len() * 2);
            for (i, segment) in candidate.iter().enumerate() {
                let s = if i % 2 == 0 { *segment } else { segment.reversed() };
                polyline.push(s.start);
                polyline.push(s.end);
            }
            out.push(polyline);
        } else {
            for (i, segment) in candidate.iter().enumerate() {
                let s = if i % 2 == 0 { segment.reversed() } else { *segment };
                out.push(vec![s.start, s.end]);
            }
        }
    }
}
