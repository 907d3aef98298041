//! Embedded map frame identity.
//!
//! The map is an external document loaded into a frame. Changing only the
//! frame's source does not reliably make the host reload it, so every frame
//! is bound to a [`RefreshKey`]: when the key changes the old frame is
//! discarded and a new one created, otherwise the existing frame is kept.

use reqwest::Url;

use crate::FilterSet;
use crate::signature::canonical_json;

/// Identity of a map frame: the serialized content of the full filter set.
///
/// Unlike the map URL, which omits empty filters, the key covers every
/// field, so clearing a date or emptying a group still changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshKey(String);

impl RefreshKey {
    /// Derives the key for `filters`.
    #[must_use]
    pub fn of(filters: &FilterSet) -> Self {
        Self(canonical_json(filters))
    }

    /// The serialized filter set.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefreshKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live map frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFrame {
    /// Key the frame was created for.
    pub key: RefreshKey,
    /// Document the frame loads.
    pub src: Url,
    /// Increments every time a frame is created.
    pub generation: u64,
}

/// What [`MapFrameSlot::present`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUpdate {
    /// The slot was empty and a frame was created.
    Created,
    /// The key changed: the previous frame was discarded and replaced.
    Recreated {
        /// Generation of the discarded frame.
        discarded: u64,
    },
    /// The key is unchanged and the existing frame was kept.
    Unchanged,
}

/// Holds at most one map frame and recreates it on key changes.
#[derive(Debug, Default)]
pub struct MapFrameSlot {
    frame: Option<MapFrame>,
    created: u64,
}

impl MapFrameSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the map for `key` loading `src`.
    pub fn present(&mut self, key: RefreshKey, src: Url) -> FrameUpdate {
        let discarded = match &self.frame {
            Some(frame) if frame.key == key => return FrameUpdate::Unchanged,
            Some(frame) => Some(frame.generation),
            None => None,
        };

        self.created += 1;
        log::debug!("Creating map frame #{} for {src}", self.created);
        self.frame = Some(MapFrame {
            key,
            src,
            generation: self.created,
        });

        discarded.map_or(FrameUpdate::Created, |discarded| FrameUpdate::Recreated {
            discarded,
        })
    }

    /// The current frame, if any.
    #[must_use]
    pub const fn frame(&self) -> Option<&MapFrame> {
        self.frame.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ApiBase;
    use crash_map_crash_models::{CauseCategory, LightingCondition};
    use crash_map_dashboard_models::FilterValue;

    fn present(slot: &mut MapFrameSlot, filters: &FilterSet) -> FrameUpdate {
        let api = ApiBase::parse("http://127.0.0.1:8000").unwrap();
        slot.present(RefreshKey::of(filters), api.map_url(filters))
    }

    #[test]
    fn key_ignores_toggle_order() {
        let mut a = FilterSet::default();
        a.toggle(FilterValue::Lighting(LightingCondition::Dusk));
        a.toggle(FilterValue::Lighting(LightingCondition::Daylight));
        a.toggle(FilterValue::Cause(CauseCategory::User));

        let mut b = FilterSet::default();
        b.toggle(FilterValue::Cause(CauseCategory::User));
        b.toggle(FilterValue::Lighting(LightingCondition::Daylight));
        b.toggle(FilterValue::Lighting(LightingCondition::Dusk));

        assert_eq!(RefreshKey::of(&a), RefreshKey::of(&b));
    }

    #[test]
    fn distinct_filters_get_distinct_keys() {
        let defaults = FilterSet::default();
        let mut cleared = defaults.clone();
        cleared.date_start = None;
        let mut moved = defaults.clone();
        moved.date_start = chrono::NaiveDate::from_ymd_opt(2017, 10, 25);
        let mut checked = defaults.clone();
        checked.set(FilterValue::Cause(CauseCategory::User), true);
        let mut other = defaults.clone();
        other.set(FilterValue::Cause(CauseCategory::Vehicle), true);

        let keys: Vec<RefreshKey> = [&defaults, &cleared, &moved, &checked, &other]
            .into_iter()
            .map(RefreshKey::of)
            .collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn recreates_frame_only_on_key_change() {
        let mut slot = MapFrameSlot::new();
        let filters = FilterSet::default();
        assert_eq!(present(&mut slot, &filters), FrameUpdate::Created);
        assert_eq!(present(&mut slot, &filters.clone()), FrameUpdate::Unchanged);

        let mut changed = filters;
        changed.date_end = None;
        assert_eq!(
            present(&mut slot, &changed),
            FrameUpdate::Recreated { discarded: 1 }
        );
        let frame = slot.frame().unwrap();
        assert_eq!(frame.generation, 2);
        assert_eq!(frame.key, RefreshKey::of(&changed));
        assert_eq!(frame.src.query(), Some("date_start=2017-10-24"));
    }
}
