//! Merges the default calendar with a user's overrides into the schedule the
//! user actually sees.
//!
//! An override shadows every default with the same vegetable name and sowing
//! type, restricted to its climate when it has one. Active overrides replace
//! the shadowed defaults; a key whose overrides are all inactive disappears.
//! An override without a climate stands in for every climate it shadows, so
//! it is emitted once per climate.

use std::collections::HashSet;

use db::models::{
    calendar_default::DefaultCalendarEntry, calendar_override::UserCalendarOverride,
    sowing_type::SowingTypeCode,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::decade::{Decade, format_range, is_in_range};
use uuid::Uuid;

use super::reference::CalendarReference;

/// One resolved calendar row. `id` is the override id when `is_customized`,
/// the default entry id otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct EffectiveCalendarEntry {
    pub id: Uuid,
    pub vegetable_name: String,
    pub climate_id: Option<i64>,
    pub climate_name: Option<String>,
    pub sowing_type_id: i64,
    pub sowing_type_code: Option<SowingTypeCode>,
    pub sowing_type_name: Option<String>,
    pub sowing_type_icon: Option<String>,
    pub sowing_start_decade: Decade,
    pub sowing_end_decade: Decade,
    pub harvest_start_decade: Decade,
    pub harvest_end_decade: Decade,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_customized: bool,
    pub is_active: bool,
}

impl EffectiveCalendarEntry {
    fn from_default(reference: &CalendarReference, entry: &DefaultCalendarEntry) -> Self {
        let mut resolved = Self {
            id: entry.id,
            vegetable_name: entry.vegetable_name.clone(),
            climate_id: Some(entry.climate_id),
            climate_name: None,
            sowing_type_id: entry.sowing_type_id,
            sowing_type_code: None,
            sowing_type_name: None,
            sowing_type_icon: None,
            sowing_start_decade: entry.sowing_start_decade,
            sowing_end_decade: entry.sowing_end_decade,
            harvest_start_decade: entry.harvest_start_decade,
            harvest_end_decade: entry.harvest_end_decade,
            growth_duration_days: entry.growth_duration_days,
            notes: entry.notes.clone(),
            is_customized: false,
            is_active: true,
        };
        resolved.annotate(reference);
        resolved
    }

    fn from_override(
        reference: &CalendarReference,
        row: &UserCalendarOverride,
        inherited_climate: Option<i64>,
    ) -> Self {
        let mut resolved = Self {
            id: row.id,
            vegetable_name: row.vegetable_name.clone(),
            climate_id: row.climate_id.or(inherited_climate),
            climate_name: None,
            sowing_type_id: row.sowing_type_id,
            sowing_type_code: None,
            sowing_type_name: None,
            sowing_type_icon: None,
            sowing_start_decade: row.sowing_start_decade,
            sowing_end_decade: row.sowing_end_decade,
            harvest_start_decade: row.harvest_start_decade,
            harvest_end_decade: row.harvest_end_decade,
            growth_duration_days: row.growth_duration_days,
            notes: row.notes.clone(),
            is_customized: true,
            is_active: row.is_active,
        };
        resolved.annotate(reference);
        resolved
    }

    fn annotate(&mut self, reference: &CalendarReference) {
        self.climate_name = self
            .climate_id
            .and_then(|id| reference.climate(id))
            .map(|c| c.name.clone());
        if let Some(sowing_type) = reference.sowing_type(self.sowing_type_id) {
            self.sowing_type_code = Some(sowing_type.code);
            self.sowing_type_name = Some(sowing_type.name.clone());
            self.sowing_type_icon = sowing_type.icon.clone();
        }
    }

    pub fn sowing_period_label(&self) -> String {
        format_range(self.sowing_start_decade, self.sowing_end_decade)
    }

    pub fn harvest_period_label(&self) -> String {
        format_range(self.harvest_start_decade, self.harvest_end_decade)
    }

    /// Whether the grid cell for `decade` shows a sowing indicator
    pub fn is_sowing_decade(&self, decade: Decade) -> bool {
        is_in_range(decade, self.sowing_start_decade, self.sowing_end_decade)
    }

    pub fn is_harvest_decade(&self, decade: Decade) -> bool {
        is_in_range(decade, self.harvest_start_decade, self.harvest_end_decade)
    }
}

fn shadows(row: &UserCalendarOverride, entry: &DefaultCalendarEntry) -> bool {
    row.vegetable_name == entry.vegetable_name
        && row.sowing_type_id == entry.sowing_type_id
        && row.climate_id.is_none_or(|climate| climate == entry.climate_id)
}

/// Resolves the effective calendar of `user_id`. Overrides belonging to other
/// users are ignored. Output follows default order, then unmatched overrides
/// in input order; use [`filter_and_sort`] for presentation order.
///
/// The same override id may appear several times, once per climate, when the
/// override has no climate of its own.
pub fn resolve_calendar(
    reference: &CalendarReference,
    overrides: &[UserCalendarOverride],
    user_id: &str,
) -> Vec<EffectiveCalendarEntry> {
    let own: Vec<&UserCalendarOverride> =
        overrides.iter().filter(|o| o.user_id == user_id).collect();
    let mut claimed: HashSet<Uuid> = HashSet::new();
    let mut emitted: HashSet<(Uuid, i64)> = HashSet::new();
    let mut resolved = Vec::with_capacity(reference.defaults.len() + own.len());

    for entry in &reference.defaults {
        let mut shadowed = false;
        for row in own.iter().filter(|row| shadows(row, entry)) {
            shadowed = true;
            claimed.insert(row.id);
            let climate_id = row.climate_id.unwrap_or(entry.climate_id);
            if row.is_active && emitted.insert((row.id, climate_id)) {
                resolved.push(EffectiveCalendarEntry::from_override(
                    reference,
                    row,
                    Some(entry.climate_id),
                ));
            }
        }
        if !shadowed {
            resolved.push(EffectiveCalendarEntry::from_default(reference, entry));
        }
    }

    for row in own {
        if row.is_active && !claimed.contains(&row.id) {
            resolved.push(EffectiveCalendarEntry::from_override(reference, row, None));
        }
    }

    resolved
}

/// Post-resolution filter: case-insensitive name substring, exact climate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct CalendarFilter {
    pub vegetable: Option<String>,
    pub climate_id: Option<i64>,
}

impl CalendarFilter {
    pub fn matches(&self, entry: &EffectiveCalendarEntry) -> bool {
        let name_matches = match self.vegetable.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => entry
                .vegetable_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let climate_matches = self
            .climate_id
            .is_none_or(|climate| entry.climate_id == Some(climate));
        name_matches && climate_matches
    }
}

/// Filters, then sorts by vegetable name and sowing start decade. The sort is
/// stable so ties keep resolution order.
pub fn filter_and_sort(
    entries: Vec<EffectiveCalendarEntry>,
    filter: &CalendarFilter,
) -> Vec<EffectiveCalendarEntry> {
    let mut entries: Vec<_> = entries.into_iter().filter(|e| filter.matches(e)).collect();
    entries.sort_by(|a, b| {
        a.vegetable_name
            .cmp(&b.vegetable_name)
            .then(a.sowing_start_decade.cmp(&b.sowing_start_decade))
    });
    entries
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::{
        climate::Climate,
        sowing_type::{SowingType, SowingTypeCode},
    };

    use super::*;

    fn d(value: i64) -> Decade {
        Decade::new(value).unwrap()
    }

    fn reference(defaults: Vec<DefaultCalendarEntry>) -> CalendarReference {
        let climate = |id, name: &str| Climate {
            id,
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        CalendarReference {
            climates: vec![climate(1, "tempéré"), climate(2, "méditerranéen")],
            sowing_types: vec![SowingType {
                id: 1,
                code: SowingTypeCode::IndoorPots,
                name: "Godets intérieur".to_string(),
                description: None,
                icon: Some("🏠".to_string()),
                created_at: Utc::now(),
            }],
            defaults,
        }
    }

    fn default_entry(
        name: &str,
        climate_id: i64,
        sowing: (i64, i64),
        harvest: (i64, i64),
    ) -> DefaultCalendarEntry {
        DefaultCalendarEntry {
            id: Uuid::new_v4(),
            vegetable_name: name.to_string(),
            climate_id,
            sowing_type_id: 1,
            sowing_start_decade: d(sowing.0),
            sowing_end_decade: d(sowing.1),
            harvest_start_decade: d(harvest.0),
            harvest_end_decade: d(harvest.1),
            growth_duration_days: None,
            notes: None,
            source: Some("seed".to_string()),
        }
    }

    fn override_row(
        user_id: &str,
        name: &str,
        sowing: (i64, i64),
        harvest: (i64, i64),
        is_active: bool,
    ) -> UserCalendarOverride {
        UserCalendarOverride {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            vegetable_name: name.to_string(),
            climate_id: None,
            sowing_type_id: 1,
            sowing_start_decade: d(sowing.0),
            sowing_end_decade: d(sowing.1),
            harvest_start_decade: d(harvest.0),
            harvest_end_decade: d(harvest.1),
            growth_duration_days: Some(90),
            notes: Some("mine".to_string()),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn defaults_pass_through_without_overrides() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let resolved = resolve_calendar(&reference, &[], "alice");

        assert_eq!(resolved.len(), 1);
        let row = &resolved[0];
        assert!(!row.is_customized);
        assert_eq!(row.id, reference.defaults[0].id);
        assert_eq!(row.climate_name.as_deref(), Some("tempéré"));
        assert_eq!(row.sowing_type_code, Some(SowingTypeCode::IndoorPots));
        assert_eq!(row.sowing_type_icon.as_deref(), Some("🏠"));
    }

    #[test]
    fn active_override_replaces_default() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let overrides = vec![override_row("alice", "tomate", (11, 13), (26, 31), true)];

        let resolved = resolve_calendar(&reference, &overrides, "alice");

        assert_eq!(resolved.len(), 1);
        let row = &resolved[0];
        assert!(row.is_customized);
        assert_eq!(row.id, overrides[0].id);
        assert_eq!(row.sowing_start_decade, d(11));
        assert_eq!(row.sowing_end_decade, d(13));
        assert_eq!(row.harvest_start_decade, d(26));
        assert_eq!(row.harvest_end_decade, d(31));
        assert_eq!(row.climate_id, Some(1));
        assert_eq!(row.notes.as_deref(), Some("mine"));
    }

    #[test]
    fn inactive_override_suppresses_row() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let overrides = vec![override_row("alice", "tomate", (11, 13), (26, 31), false)];

        assert!(resolve_calendar(&reference, &overrides, "alice").is_empty());
    }

    #[test]
    fn other_users_overrides_are_ignored() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let overrides = vec![override_row("bob", "tomate", (11, 13), (26, 31), true)];

        let resolved = resolve_calendar(&reference, &overrides, "alice");
        assert_eq!(resolved.len(), 1);
        assert!(!resolved[0].is_customized);
    }

    #[test]
    fn multiple_windows_replace_the_default_together() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let overrides = vec![
            override_row("alice", "tomate", (8, 9), (20, 24), true),
            override_row("alice", "tomate", (14, 15), (28, 32), true),
            override_row("alice", "tomate", (17, 18), (30, 33), false),
        ];

        let resolved = resolve_calendar(&reference, &overrides, "alice");
        let starts: Vec<_> = resolved.iter().map(|r| r.sowing_start_decade.get()).collect();
        assert_eq!(starts, vec![8, 14]);
        assert!(resolved.iter().all(|r| r.is_customized));
    }

    #[test]
    fn climate_bound_override_only_shadows_its_climate() {
        let reference = reference(vec![
            default_entry("tomate", 1, (10, 12), (25, 30)),
            default_entry("tomate", 2, (5, 8), (16, 29)),
        ]);
        let mut row = override_row("alice", "tomate", (11, 13), (26, 31), true);
        row.climate_id = Some(2);

        let resolved = resolve_calendar(&reference, &[row], "alice");
        assert_eq!(resolved.len(), 2);
        assert!(!resolved[0].is_customized);
        assert_eq!(resolved[0].climate_id, Some(1));
        assert!(resolved[1].is_customized);
        assert_eq!(resolved[1].climate_name.as_deref(), Some("méditerranéen"));
    }

    #[test]
    fn override_without_matching_default_is_emitted() {
        let reference = reference(vec![default_entry("tomate", 1, (10, 12), (25, 30))]);
        let overrides = vec![override_row("alice", "Physalis", (7, 9), (22, 28), true)];

        let resolved = resolve_calendar(&reference, &overrides, "alice");
        assert_eq!(resolved.len(), 2);
        let physalis = resolved
            .iter()
            .find(|r| r.vegetable_name == "Physalis")
            .unwrap();
        assert!(physalis.is_customized);
        assert_eq!(physalis.climate_id, None);
        assert_eq!(physalis.climate_name, None);
    }

    #[test]
    fn filter_is_case_insensitive_and_sorts_by_name_then_start() {
        let reference = reference(vec![
            default_entry("Tomates", 1, (13, 15), (19, 28)),
            default_entry("Carottes", 1, (8, 20), (16, 33)),
            default_entry("Tomates", 1, (7, 10), (19, 28)),
            default_entry("Tomates cerises", 2, (6, 9), (19, 28)),
        ]);
        let resolved = resolve_calendar(&reference, &[], "alice");

        let all = filter_and_sort(resolved.clone(), &CalendarFilter::default());
        let order: Vec<_> = all
            .iter()
            .map(|r| (r.vegetable_name.as_str(), r.sowing_start_decade.get()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Carottes", 8),
                ("Tomates", 7),
                ("Tomates", 13),
                ("Tomates cerises", 6)
            ]
        );

        let filter = CalendarFilter {
            vegetable: Some("TOMATE".to_string()),
            climate_id: Some(1),
        };
        let tomatoes = filter_and_sort(resolved.clone(), &filter);
        assert_eq!(tomatoes.len(), 2);
        assert!(tomatoes.iter().all(|r| r.vegetable_name == "Tomates"));

        let blank = CalendarFilter {
            vegetable: Some("  ".to_string()),
            climate_id: None,
        };
        assert_eq!(filter_and_sort(resolved, &blank).len(), 4);
    }

    #[test]
    fn sort_keeps_resolution_order_for_ties() {
        let first = default_entry("Salade", 1, (10, 24), (15, 30));
        let second = default_entry("Salade", 2, (10, 24), (12, 30));
        let (first_id, second_id) = (first.id, second.id);
        let reference = reference(vec![first, second]);

        let sorted = filter_and_sort(
            resolve_calendar(&reference, &[], "alice"),
            &CalendarFilter::default(),
        );
        assert_eq!(sorted[0].id, first_id);
        assert_eq!(sorted[1].id, second_id);
    }

    #[test]
    fn labels_and_cells_use_decade_math() {
        let reference = reference(vec![default_entry("Fèves", 2, (31, 5), (10, 15))]);
        let row = &resolve_calendar(&reference, &[], "alice")[0];

        assert_eq!(row.sowing_period_label(), "début Novembre - mi Février");
        assert_eq!(row.harvest_period_label(), "début Avril - fin Mai");
        assert!(row.is_sowing_decade(d(1)));
        assert!(row.is_sowing_decade(d(36)));
        assert!(!row.is_sowing_decade(d(20)));
        assert!(row.is_harvest_decade(d(12)));
    }

    #[test]
    fn climate_less_override_is_listed_under_every_climate_it_shadows() {
        let reference = reference(vec![
            default_entry("tomate", 1, (10, 12), (25, 30)),
            default_entry("tomate", 2, (5, 8), (16, 29)),
        ]);
        let overrides = vec![override_row("alice", "tomate", (11, 13), (26, 31), true)];
        let resolved = resolve_calendar(&reference, &overrides, "alice");

        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|r| r.is_customized && r.id == overrides[0].id));

        for climate_id in [1, 2] {
            let filter = CalendarFilter {
                vegetable: Some("tomate".to_string()),
                climate_id: Some(climate_id),
            };
            let rows = filter_and_sort(resolved.clone(), &filter);
            assert_eq!(rows.len(), 1, "climate {climate_id}");
            assert_eq!(rows[0].climate_id, Some(climate_id));
            assert_eq!(rows[0].sowing_start_decade, d(11));
        }

        let unfiltered = filter_and_sort(resolved, &CalendarFilter::default());
        let climates: Vec<_> = unfiltered.iter().map(|r| r.climate_id).collect();
        assert_eq!(climates, vec![Some(1), Some(2)]);
    }

    #[test]
    fn inactive_climate_less_override_hides_every_climate() {
        let reference = reference(vec![
            default_entry("tomate", 1, (10, 12), (25, 30)),
            default_entry("tomate", 2, (5, 8), (16, 29)),
        ]);
        let overrides = vec![override_row("alice", "tomate", (11, 13), (26, 31), false)];

        let filter = CalendarFilter {
            vegetable: None,
            climate_id: Some(2),
        };
        let rows = filter_and_sort(resolve_calendar(&reference, &overrides, "alice"), &filter);
        assert!(rows.is_empty());
    }
}
