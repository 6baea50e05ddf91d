// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic labels and label filters.

bitflags::bitflags! {
    /// Semantic classification of an anchor.
    ///
    /// An anchor may carry several labels. Labels are independent of the anchor's geometry kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AnchorLabels: u32 {
        /// Floor surface.
        const FLOOR               = 1 << 0;
        /// Ceiling surface.
        const CEILING             = 1 << 1;
        /// Wall face.
        const WALL_FACE           = 1 << 2;
        /// Wall face added to close an open room; not a physical wall.
        const INVISIBLE_WALL_FACE = 1 << 3;
        /// Table.
        const TABLE               = 1 << 4;
        /// Couch or other seating furniture.
        const COUCH               = 1 << 5;
        /// Door frame.
        const DOOR_FRAME          = 1 << 6;
        /// Window frame.
        const WINDOW_FRAME        = 1 << 7;
        /// Storage furniture.
        const STORAGE             = 1 << 8;
        /// Bed.
        const BED                 = 1 << 9;
        /// Screen or monitor.
        const SCREEN              = 1 << 10;
        /// Lamp.
        const LAMP                = 1 << 11;
        /// Plant.
        const PLANT               = 1 << 12;
        /// Wall art.
        const WALL_ART            = 1 << 13;
        /// Triangle mesh covering the whole scanned space.
        const GLOBAL_MESH         = 1 << 14;
        /// Anything else.
        const OTHER               = 1 << 15;

        /// Every label that classifies a wall.
        const WALLS = Self::WALL_FACE.bits() | Self::INVISIBLE_WALL_FACE.bits();
        /// Labels an anchor can be sat on.
        const SEATS = Self::COUCH.bits();
    }
}

impl Default for AnchorLabels {
    fn default() -> Self {
        Self::empty()
    }
}

impl AnchorLabels {
    /// Interchange names of the single labels in this set, in bit order.
    ///
    /// Names come from the flag definitions, so `WALL_FACE` reads as `"WALL_FACE"`. Composite
    /// masks such as [`AnchorLabels::WALLS`] are never yielded. Parse names back with the
    /// generated `from_name`.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        self.iter_names()
            .filter(|(_, label)| label.bits().is_power_of_two())
            .map(|(name, _)| name)
    }
}

/// Include/exclude filter over labels.
///
/// An anchor passes iff (`included` is empty or it shares at least one included label) and it
/// shares no excluded label. The default filter passes everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelFilter {
    /// Labels of which at least one must be present. Empty means "any".
    pub included: AnchorLabels,
    /// Labels of which none may be present.
    pub excluded: AnchorLabels,
}

impl LabelFilter {
    /// Filter that passes everything.
    pub const ALL: Self = Self {
        included: AnchorLabels::empty(),
        excluded: AnchorLabels::empty(),
    };

    /// Filter that requires any of `labels`.
    pub const fn including(labels: AnchorLabels) -> Self {
        Self {
            included: labels,
            excluded: AnchorLabels::empty(),
        }
    }

    /// Filter that rejects any of `labels`.
    pub const fn excluding(labels: AnchorLabels) -> Self {
        Self {
            included: AnchorLabels::empty(),
            excluded: labels,
        }
    }

    /// Whether an anchor carrying `labels` passes.
    pub fn passes(&self, labels: AnchorLabels) -> bool {
        (self.included.is_empty() || self.included.intersects(labels))
            && !self.excluded.intersects(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let labels = AnchorLabels::TABLE | AnchorLabels::STORAGE;
        let names: Vec<_> = labels.names().collect();
        assert_eq!(names, ["TABLE", "STORAGE"]);
        let parsed = names
            .iter()
            .filter_map(|n| AnchorLabels::from_name(n))
            .fold(AnchorLabels::empty(), |acc, l| acc | l);
        assert_eq!(parsed, labels);
        assert_eq!(AnchorLabels::from_name("SPACESHIP"), None);
        assert_eq!(AnchorLabels::from_name("WALL_FACE"), Some(AnchorLabels::WALL_FACE));
    }

    #[test]
    fn composite_masks_are_not_named() {
        let names: Vec<_> = AnchorLabels::WALLS.names().collect();
        assert_eq!(names, ["WALL_FACE", "INVISIBLE_WALL_FACE"]);
        let seats: Vec<_> = AnchorLabels::SEATS.names().collect();
        assert_eq!(seats, ["COUCH"]);
    }

    #[test]
    fn filter_semantics() {
        let wall = AnchorLabels::WALL_FACE;
        let table_lamp = AnchorLabels::TABLE | AnchorLabels::LAMP;

        assert!(LabelFilter::ALL.passes(wall));
        assert!(LabelFilter::ALL.passes(AnchorLabels::empty()));

        let inc = LabelFilter::including(AnchorLabels::TABLE | AnchorLabels::COUCH);
        assert!(inc.passes(table_lamp));
        assert!(!inc.passes(wall));

        let exc = LabelFilter::excluding(AnchorLabels::LAMP);
        assert!(!exc.passes(table_lamp));
        assert!(exc.passes(wall));

        let both = LabelFilter {
            included: AnchorLabels::TABLE,
            excluded: AnchorLabels::LAMP,
        };
        assert!(!both.passes(table_lamp), "exclusion wins over inclusion");
    }
}
