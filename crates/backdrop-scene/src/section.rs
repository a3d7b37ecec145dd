//! Page sections and the scroll-driven orientation state machine.
//!
//! The page is a vertical stack of named bands. Whichever band straddles the
//! viewport's vertical midpoint is the active section; each change of active
//! section reorients the background field with one eased transition.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use glam::Vec3;

use crate::primitive::PrimitiveSet;
use crate::tween::{Ease, Tween};

/// Duration of a section reorientation.
pub const SECTION_EASE_SECS: f32 = 1.5;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Section {
    #[default]
    Hero,
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    /// Page order, top to bottom.
    pub const ALL: [Section; 5] = [
        Section::Hero,
        Section::About,
        Section::Projects,
        Section::Skills,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Contact => "contact",
        }
    }

    /// Target XYZ Euler orientation of the field while this section is active.
    pub fn orientation(self) -> Vec3 {
        match self {
            Section::Hero => Vec3::ZERO,
            Section::About => Vec3::new(FRAC_PI_4, FRAC_PI_4, 0.0),
            Section::Projects => Vec3::new(-FRAC_PI_4, -FRAC_PI_4, 0.0),
            Section::Skills => Vec3::new(FRAC_PI_2, 0.0, 0.0),
            Section::Contact => Vec3::new(0.0, FRAC_PI_2, 0.0),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ── SectionLayout ─────────────────────────────────────────────────────────

/// One section's vertical extent in document pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionBand {
    pub section: Section,
    pub top: f32,
    pub height: f32,
}

impl SectionBand {
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Open-interval test: a midpoint exactly on an edge belongs to neither band.
    #[inline]
    pub fn straddles(&self, y: f32) -> bool {
        self.top < y && self.bottom() > y
    }
}

/// Vertically stacked section bands, ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    bands: Vec<SectionBand>,
}

impl SectionLayout {
    /// Stacks `(section, height)` pairs from document top.
    pub fn stacked(sections: &[(Section, f32)]) -> Self {
        let mut top = 0.0;
        let bands = sections
            .iter()
            .map(|&(section, height)| {
                let band = SectionBand { section, top, height: height.max(0.0) };
                top += band.height;
                band
            })
            .collect();
        Self { bands }
    }

    /// Default page proportions in units of the viewport height.
    pub fn for_viewport(viewport_height: f32) -> Self {
        const WEIGHTS: [f32; 5] = [1.0, 1.4, 1.8, 1.6, 1.0];
        let h = viewport_height.max(1.0);
        let sections: Vec<_> = Section::ALL
            .into_iter()
            .zip(WEIGHTS)
            .map(|(s, w)| (s, w * h))
            .collect();
        Self::stacked(&sections)
    }

    #[inline]
    pub fn bands(&self) -> &[SectionBand] {
        &self.bands
    }

    pub fn band(&self, section: Section) -> Option<&SectionBand> {
        self.bands.iter().find(|b| b.section == section)
    }

    pub fn document_height(&self) -> f32 {
        self.bands.last().map_or(0.0, SectionBand::bottom)
    }

    fn index_of(&self, section: Section) -> Option<usize> {
        self.bands.iter().position(|b| b.section == section)
    }

    fn index_at(&self, y: f32) -> Option<usize> {
        self.bands.iter().position(|b| b.straddles(y))
    }
}

// ── SectionTracker ────────────────────────────────────────────────────────

/// Current active section. Starts at `Hero` and lives for the page lifetime.
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    current: Section,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Section {
        self.current
    }

    /// Re-evaluates the active section after a scroll to `scroll_y`.
    ///
    /// Returns the sections entered, in order. A jump across several bands
    /// reports every band in between so no section is skipped.
    pub fn on_scroll(
        &mut self,
        layout: &SectionLayout,
        scroll_y: f32,
        viewport_height: f32,
    ) -> Vec<Section> {
        let mid = scroll_y + viewport_height * 0.5;
        let Some(target) = layout.index_at(mid) else {
            return Vec::new();
        };

        let Some(from) = layout.index_of(self.current) else {
            // Current section is not on this page; jump straight to the target.
            self.current = layout.bands()[target].section;
            return vec![self.current];
        };

        let entered: Vec<Section> = if target > from {
            layout.bands()[from + 1..=target].iter().map(|b| b.section).collect()
        } else if target < from {
            layout.bands()[target..from].iter().rev().map(|b| b.section).collect()
        } else {
            Vec::new()
        };

        if let Some(&last) = entered.last() {
            self.current = last;
        }
        entered
    }
}

// ── SectionOrchestrator ───────────────────────────────────────────────────

/// Drives the field orientation from section changes.
///
/// There is a single transition; a new section retargets it rather than
/// queueing behind it.
#[derive(Debug, Clone, Default)]
pub struct SectionOrchestrator {
    tracker: SectionTracker,
    transition: Option<Tween>,
}

impl SectionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Section {
        self.tracker.current()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Handles a scroll event. `rotation` is the field's current orientation,
    /// used as the start value when no transition is in flight.
    pub fn on_scroll(
        &mut self,
        layout: &SectionLayout,
        scroll_y: f32,
        viewport_height: f32,
        rotation: Vec3,
    ) -> Vec<Section> {
        let entered = self.tracker.on_scroll(layout, scroll_y, viewport_height);
        for section in &entered {
            log::debug!("section -> {section}");
            let target = section.orientation();
            match self.transition.as_mut() {
                Some(t) if !t.is_finished() => t.retarget(target),
                _ => {
                    self.transition =
                        Some(Tween::new(rotation, target, SECTION_EASE_SECS, Ease::Power2InOut));
                }
            }
        }
        entered
    }

    /// Advances the in-flight transition and writes it over the set's rotation.
    pub fn apply(&mut self, set: &mut PrimitiveSet, dt: f32) {
        let Some(t) = self.transition.as_mut() else { return };
        set.transform.rotation = t.advance(dt);
        if t.is_finished() {
            self.transition = None;
        }
    }
}
