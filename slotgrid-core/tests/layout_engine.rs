use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use slotgrid_core::dates::{round_by_start_day_hour, trim_time};
use slotgrid_core::timezone::parse_zone;
use slotgrid_core::{
    Collaborators, DateRange, FieldResourceManager, GeometryProvider, Group, LayoutEngine,
    LayoutSettings, Position, RRuleExpander, RawAppointment, ResourceAssignment,
    TimezoneTranslator, UniformGrid, ViewKind, ViewRenderStrategy, ZoneTranslator,
};

struct Harness {
    translator: ZoneTranslator,
    expander: RRuleExpander,
    resources: FieldResourceManager,
    grid: UniformGrid,
    render: ViewRenderStrategy,
    settings: LayoutSettings,
}

impl Harness {
    fn new(grid: UniformGrid) -> Self {
        Self::with_view(grid, ViewKind::Week)
    }

    fn with_view(grid: UniformGrid, kind: ViewKind) -> Self {
        let render = ViewRenderStrategy::new(kind, grid.date_range().max);
        Harness {
            translator: ZoneTranslator::new(chrono_tz::UTC, None),
            expander: RRuleExpander::default(),
            resources: FieldResourceManager::default(),
            grid,
            render,
            settings: LayoutSettings::default(),
        }
    }

    fn zones(mut self, native: &str, grid: Option<&str>) -> Self {
        let native_zone = parse_zone(native).unwrap();
        let grid_zone = grid.map(|name| parse_zone(name).unwrap());
        self.translator = ZoneTranslator::new(native_zone, grid_zone);
        self.expander = RRuleExpander::new(native_zone, self.settings.recurrence_limit);
        self.settings.time_zone = grid.map(str::to_string);
        self
    }

    fn virtual_scrolling(mut self, enabled: bool) -> Self {
        self.settings.virtual_scrolling = enabled;
        self
    }

    fn engine(&self) -> LayoutEngine<'_> {
        self.engine_over(&self.grid)
    }

    fn engine_over<'h>(&'h self, geometry: &'h dyn GeometryProvider) -> LayoutEngine<'h> {
        let deps = Collaborators {
            timezone: &self.translator,
            recurrence: &self.expander,
            resources: &self.resources,
            geometry,
            render: &self.render,
        };
        LayoutEngine::new(deps, self.settings.clone())
    }
}

/// Delegates to a `UniformGrid` but reports no starting cell for one group.
struct MissingStartCell {
    inner: UniformGrid,
    missing: usize,
}

impl GeometryProvider for MissingStartCell {
    fn date_range(&self) -> DateRange {
        self.inner.date_range()
    }

    fn interval_duration(&self, all_day: bool) -> Duration {
        self.inner.interval_duration(all_day)
    }

    fn supports_all_day_row(&self) -> bool {
        self.inner.supports_all_day_row()
    }

    fn group_count(&self) -> usize {
        self.inner.group_count()
    }

    fn group_indices_for(&self, resources: &[ResourceAssignment]) -> Vec<usize> {
        self.inner.group_indices_for(resources)
    }

    fn group_indices(&self) -> Vec<usize> {
        self.inner.group_indices()
    }

    fn group_start_date(&self, group_index: usize) -> Option<NaiveDateTime> {
        if group_index == self.missing {
            return None;
        }
        self.inner.group_start_date(group_index)
    }

    fn find_group_cell_start_date(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        all_day: bool,
    ) -> Option<NaiveDateTime> {
        self.inner.find_group_cell_start_date(group_index, start, end, all_day)
    }

    fn is_group_intersect_date_interval(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool {
        self.inner.is_group_intersect_date_interval(group_index, start, end)
    }

    fn coordinates_by_date_in_group(
        &self,
        date: NaiveDateTime,
        resources: &[ResourceAssignment],
        all_day: bool,
        group_index: Option<usize>,
    ) -> Vec<Position> {
        self.inner.coordinates_by_date_in_group(date, resources, all_day, group_index)
    }

    fn coordinates_by_date(
        &self,
        date: NaiveDateTime,
        group_index: usize,
        all_day: bool,
    ) -> Option<Position> {
        self.inner.coordinates_by_date(date, group_index, all_day)
    }
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn at(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(m, d).and_hms_opt(h, min, 0).unwrap()
}

fn rooms(ids: &[&str]) -> Vec<Group> {
    ids.iter().map(|id| Group::new("room", id)).collect()
}

#[test]
fn scenario_a_end_is_sixty_wall_clock_minutes_across_spring_forward() {
    let harness = Harness::new(UniformGrid::new(day(3, 9), 3)).zones("America/New_York", None);
    let raw = RawAppointment::new("Night shift", at(3, 9, 23, 30), at(3, 10, 0, 30))
        .with_rule("FREQ=DAILY;COUNT=1");

    let occurrences = harness.engine().occurrences(&raw);

    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].start_date, at(3, 9, 23, 30));
    assert_eq!(occurrences[0].end_date, at(3, 10, 0, 30));
}

#[test]
fn scenario_b_daily_rule_yields_one_occurrence_per_visible_day() {
    let harness = Harness::new(UniformGrid::new(day(6, 1), 5));
    let raw = RawAppointment::new("Standup", at(5, 20, 9, 0), at(5, 20, 9, 15))
        .with_rule("FREQ=DAILY");

    let occurrences = harness.engine().occurrences(&raw);

    let starts: Vec<NaiveDateTime> = occurrences.iter().map(|o| o.start_date).collect();
    assert_eq!(
        starts,
        vec![at(6, 1, 9, 0), at(6, 2, 9, 0), at(6, 3, 9, 0), at(6, 4, 9, 0), at(6, 5, 9, 0)]
    );

    let coordinates = harness.engine().create(&raw);
    assert_eq!(coordinates.len(), 5);
}

#[test]
fn scenario_c_zero_length_appointment_is_bumped_by_a_minute() {
    let raw = RawAppointment::new("Ping", at(6, 3, 12, 0), at(6, 3, 12, 0));

    for enabled in [false, true] {
        let harness = Harness::new(UniformGrid::new(day(6, 1), 7)).virtual_scrolling(enabled);
        let coordinates = harness.engine().create(&raw);

        assert_eq!(coordinates.len(), 1, "virtual scrolling: {enabled}");
        let occurrence = coordinates[0].info.appointment;
        assert_eq!(occurrence.end_date, occurrence.start_date + Duration::minutes(1));
    }
}

#[test]
fn scenario_d_virtual_resolves_only_groups_with_a_starting_cell() {
    let grid = UniformGrid::new(day(6, 1), 7)
        .with_groups(rooms(&["a", "b", "c"]))
        .with_rendered_groups(vec![0, 1]);
    let harness = Harness::new(grid).virtual_scrolling(true);
    let raw = RawAppointment::new("Inspection", at(6, 4, 10, 0), at(6, 4, 11, 0))
        .with_resource("room", &["a", "b", "c"]);

    let coordinates = harness.engine().create(&raw);

    assert_eq!(coordinates.len(), 2);
    let groups: Vec<Option<usize>> =
        coordinates.iter().map(|c| c.info.appointment.group_index()).collect();
    assert_eq!(groups, vec![Some(0), Some(1)]);
}

#[test]
fn virtual_skips_a_rendered_group_without_a_start_cell() {
    let grid = UniformGrid::new(day(6, 1), 7).with_groups(rooms(&["a", "b", "c"]));
    let harness = Harness::new(grid.clone()).virtual_scrolling(true);
    let geometry = MissingStartCell {
        inner: grid,
        missing: 2,
    };
    let raw = RawAppointment::new("Inspection", at(6, 4, 10, 0), at(6, 4, 11, 0))
        .with_resource("room", &["a", "b", "c"]);

    // all three groups resolve on the plain grid
    assert_eq!(harness.engine().create(&raw).len(), 3);

    let coordinates = harness.engine_over(&geometry).create(&raw);

    assert_eq!(coordinates.len(), 2);
    let groups: Vec<Option<usize>> =
        coordinates.iter().map(|c| c.info.appointment.group_index()).collect();
    assert_eq!(groups, vec![Some(0), Some(1)]);
}

#[test]
fn base_and_virtual_agree_for_a_plain_appointment() {
    let raw = RawAppointment::new("1:1", at(6, 5, 14, 0), at(6, 5, 14, 30));

    let base = Harness::new(UniformGrid::new(day(6, 1), 7));
    let virtualized = Harness::new(UniformGrid::new(day(6, 1), 7)).virtual_scrolling(true);

    let from_base = base.engine().create(&raw);
    let from_virtual = virtualized.engine().create(&raw);

    assert_eq!(from_base.len(), from_virtual.len());
    for (b, v) in from_base.iter().zip(&from_virtual) {
        assert_eq!(b.info.appointment.start_date, v.info.appointment.start_date);
        assert_eq!(b.position, v.position);
    }
}

#[test]
fn cropped_starts_stay_inside_the_view() {
    let raw = RawAppointment::new("Overnight", at(5, 31, 22, 0), at(6, 1, 10, 0));
    let start_day = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

    for enabled in [false, true] {
        let grid = UniformGrid::new(day(6, 1), 7).with_day_hours(8.0, 20.0);
        let mut harness = Harness::new(grid).virtual_scrolling(enabled);
        harness.settings.start_day_hour = 8.0;
        let range = harness.grid.date_range();

        let coordinates = harness.engine().create(&raw);

        assert_eq!(coordinates.len(), 1, "virtual scrolling: {enabled}");
        let start = coordinates[0].info.appointment.start_date;
        assert_eq!(start, at(6, 1, 8, 0));
        assert!(range.contains(start));
        assert!(start >= round_by_start_day_hour(range.min, start_day));
    }
}

#[test]
fn month_view_parts_sit_on_interval_boundaries() {
    let grid = UniformGrid::new(day(6, 1), 30).with_cell_duration(Duration::days(1));
    let harness = Harness::with_view(grid, ViewKind::Month);
    let raw = RawAppointment::new("Offsite", at(6, 3, 10, 0), at(6, 6, 9, 0));

    let coordinates = harness.engine().create(&raw);

    let starts: Vec<NaiveDateTime> =
        coordinates.iter().map(|c| c.info.appointment.start_date).collect();
    assert_eq!(starts, vec![at(6, 3, 10, 0), at(6, 4, 10, 0), at(6, 5, 10, 0)]);

    // boundaries tile the occurrence: each step is one interval, the last
    // one starts before the end and the next would not
    let step = harness.grid.interval_duration(false);
    assert!(starts.windows(2).all(|pair| pair[1] - pair[0] == step));
    assert!(*starts.last().unwrap() < raw.end_date);
    assert!(*starts.last().unwrap() + step >= raw.end_date);

    let parents: Vec<NaiveDateTime> =
        coordinates.iter().map(|c| c.info.appointment.source.start_date).collect();
    assert!(parents.iter().all(|start| *start == at(6, 3, 10, 0)));
}

#[test]
fn month_view_parts_stop_at_the_view_end() {
    let grid = UniformGrid::new(day(6, 1), 30).with_cell_duration(Duration::days(1));
    let range = grid.date_range();
    let harness = Harness::with_view(grid, ViewKind::Month);
    let raw = RawAppointment::new("Conference", at(6, 29, 10, 0), at(7, 3, 10, 0));

    let coordinates = harness.engine().create(&raw);

    assert_eq!(coordinates.len(), 2);
    assert!(coordinates.iter().all(|c| c.info.appointment.start_date < range.max));
}

#[test]
fn constant_offset_zone_projection_matches_plain_translation() {
    let harness = Harness::new(UniformGrid::new(day(3, 8), 5)).zones("UTC", Some("Asia/Tokyo"));
    let raw = RawAppointment::new("Sync", at(3, 1, 1, 0), at(3, 1, 2, 0)).with_rule("FREQ=DAILY");

    let occurrences = harness.engine().occurrences(&raw);

    assert!(!occurrences.is_empty());
    for occurrence in &occurrences {
        assert_eq!(occurrence.start_date, harness.translator.to_grid(occurrence.source.start_date));
        assert_eq!(occurrence.end_date, harness.translator.to_grid(occurrence.source.end_date));
        assert_eq!(occurrence.duration(), Duration::hours(1));
    }
}

#[test]
fn recurring_appointment_keeps_display_time_across_dst() {
    let harness =
        Harness::new(UniformGrid::new(day(3, 8), 5)).zones("UTC", Some("America/New_York"));
    let raw = RawAppointment::new("Standup", at(3, 1, 14, 0), at(3, 1, 14, 30))
        .with_rule("FREQ=DAILY");

    let coordinates = harness.engine().create(&raw);

    assert_eq!(coordinates.len(), 5);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    for coordinate in &coordinates {
        assert_eq!(coordinate.info.appointment.start_date.time(), nine);
    }
}

#[test]
fn native_dst_shift_moves_the_source_but_not_the_grid_time() {
    let harness =
        Harness::new(UniformGrid::new(day(3, 28), 6)).zones("Europe/Berlin", Some("Asia/Tokyo"));
    let raw = RawAppointment::new("Call", at(3, 28, 10, 0), at(3, 28, 11, 0))
        .with_rule("FREQ=DAILY");

    let occurrences = harness.engine().occurrences(&raw);

    assert_eq!(occurrences.len(), 6);
    for occurrence in &occurrences {
        assert_eq!(occurrence.start_date.time(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(occurrence.duration(), Duration::hours(1));
        let native_hour = if occurrence.start_date.date() < day(3, 31) { 10 } else { 11 };
        assert_eq!(
            occurrence.source.start_date.time(),
            NaiveTime::from_hms_opt(native_hour, 0, 0).unwrap(),
            "{occurrence:?}"
        );
    }
}

#[test]
fn exceptions_remove_occurrences() {
    let harness = Harness::new(UniformGrid::new(day(6, 1), 7));
    let raw = RawAppointment::new("Standup", at(6, 1, 9, 0), at(6, 1, 9, 15))
        .with_rule("FREQ=DAILY")
        .with_exception("20240603T090000,20240605T090000");

    let coordinates = harness.engine().create(&raw);

    let days: Vec<NaiveDate> =
        coordinates.iter().map(|c| c.info.appointment.start_date.date()).collect();
    assert_eq!(days, vec![day(6, 1), day(6, 2), day(6, 4), day(6, 6), day(6, 7)]);
}

#[test]
fn virtual_drops_occurrences_outside_the_rendered_window() {
    let grid = UniformGrid::new(day(6, 1), 7)
        .with_groups(rooms(&["a", "b"]))
        .with_window(1, DateRange::new(at(6, 2, 0, 0), at(6, 4, 0, 0)));
    let base = Harness::new(grid.clone());
    let virtualized = Harness::new(grid).virtual_scrolling(true);
    let raw = RawAppointment::new("Rounds", at(6, 1, 9, 0), at(6, 1, 10, 0))
        .with_rule("FREQ=DAILY")
        .with_resource("room", &["b"]);

    let from_virtual = virtualized.engine().create(&raw);
    let starts: Vec<NaiveDateTime> =
        from_virtual.iter().map(|c| c.info.appointment.start_date).collect();
    assert_eq!(starts, vec![at(6, 2, 9, 0), at(6, 3, 9, 0)]);

    // the eager strategy has no per-group cut, only the grid's own lookups
    let from_base = base.engine().create(&raw);
    assert_eq!(from_base.len(), 2);
}

#[test]
fn all_day_appointment_lands_in_the_all_day_row() {
    let raw = RawAppointment::new("Holiday", at(6, 3, 0, 0), at(6, 4, 0, 0)).with_all_day(true);

    for enabled in [false, true] {
        let harness = Harness::new(UniformGrid::new(day(6, 1), 7)).virtual_scrolling(enabled);
        let coordinates = harness.engine().create(&raw);

        assert_eq!(coordinates.len(), 1, "virtual scrolling: {enabled}");
        assert!(coordinates[0].position.all_day);
        assert_eq!(trim_time(coordinates[0].info.appointment.start_date), at(6, 3, 0, 0));
    }
}

#[test]
fn all_day_appointment_without_an_all_day_row_is_laid_out_as_timed() {
    let harness = Harness::new(UniformGrid::new(day(6, 1), 7).with_all_day_row(false));
    let raw = RawAppointment::new("Holiday", at(6, 3, 0, 0), at(6, 4, 0, 0)).with_all_day(true);

    let coordinates = harness.engine().create(&raw);

    assert_eq!(coordinates.len(), 1);
    assert!(!coordinates[0].position.all_day);
    assert_eq!(coordinates[0].position.row_index, 0);
}

#[test]
fn every_resolved_occurrence_is_non_degenerate() {
    let harness = Harness::new(UniformGrid::new(day(6, 1), 7)).virtual_scrolling(true);
    let appointments = [
        RawAppointment::new("a", at(6, 2, 9, 0), at(6, 2, 9, 0)),
        RawAppointment::new("b", at(6, 2, 9, 0), at(6, 2, 8, 0)),
        RawAppointment::new("c", at(6, 1, 9, 0), at(6, 1, 9, 0)).with_rule("FREQ=DAILY"),
    ];

    for raw in &appointments {
        for coordinate in harness.engine().create(raw) {
            let occurrence = coordinate.info.appointment;
            assert!(occurrence.end_date > occurrence.start_date, "{}: {occurrence:?}", raw.text);
        }
    }
}
