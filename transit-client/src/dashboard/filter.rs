//! Client-side filtering of fetched lists.

use chrono::Weekday;

use crate::api::{Delay, Route, Schedule, Station};

/// Routes whose name, operator or end stations contain `needle`
/// (case-insensitive). An empty needle keeps everything.
pub fn filter_routes<'a>(routes: &'a [Route], needle: &str) -> Vec<&'a Route> {
    let needle = needle.trim().to_lowercase();
    routes
        .iter()
        .filter(|r| {
            needle.is_empty()
                || contains(&r.route_name, &needle)
                || r.operator.as_deref().is_some_and(|o| contains(o, &needle))
                || contains(&r.start_station, &needle)
                || contains(&r.end_station, &needle)
        })
        .collect()
}

/// Stations whose name or address contains `needle` (case-insensitive).
/// An empty needle keeps everything.
pub fn filter_stations<'a>(stations: &'a [Station], needle: &str) -> Vec<&'a Station> {
    let needle = needle.trim().to_lowercase();
    stations
        .iter()
        .filter(|s| {
            needle.is_empty()
                || contains(&s.station_name, &needle)
                || s.address.as_deref().is_some_and(|a| contains(a, &needle))
        })
        .collect()
}

/// Schedules running on `day`. `None` keeps everything.
///
/// Day names compare case-insensitively, and abbreviations match their full
/// name ("Mon" matches "Monday").
pub fn filter_schedules_by_day<'a>(
    schedules: &'a [Schedule],
    day: Option<&str>,
) -> Vec<&'a Schedule> {
    filter_schedules(schedules, day, "")
}

/// Schedules running on `day` whose route, departure station or arrival
/// station contains `needle` (case-insensitive).
///
/// Both filters are optional: `None`/blank day and blank needle keep
/// everything.
pub fn filter_schedules<'a>(
    schedules: &'a [Schedule],
    day: Option<&str>,
    needle: &str,
) -> Vec<&'a Schedule> {
    let day = day.map(str::trim).filter(|d| !d.is_empty());
    let needle = needle.trim().to_lowercase();

    schedules
        .iter()
        .filter(|s| match day {
            Some(day) => s.day_of_week.as_deref().is_some_and(|d| same_day(d, day)),
            None => true,
        })
        .filter(|s| {
            needle.is_empty()
                || contains(&s.route_name, &needle)
                || contains(&s.departure_station, &needle)
                || contains(&s.arrival_station, &needle)
        })
        .collect()
}

/// Delay reports still in effect.
pub fn active_delays(delays: &[Delay]) -> Vec<&Delay> {
    delays.iter().filter(|d| d.is_active == Some(true)).collect()
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn same_day(a: &str, b: &str) -> bool {
    match (a.trim().parse::<Weekday>(), b.trim().parse::<Weekday>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(route_id: i64, name: &str, operator: Option<&str>, end: &str) -> Route {
        Route {
            route_id,
            route_name: name.to_string(),
            route_type: "bus".to_string(),
            operator: operator.map(str::to_string),
            start_station: "Central".to_string(),
            end_station: end.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn station(station_id: i64, name: &str, address: Option<&str>) -> Station {
        Station {
            station_id,
            station_name: name.to_string(),
            station_type: Some("bus_stop".to_string()),
            latitude: None,
            longitude: None,
            address: address.map(str::to_string),
        }
    }

    fn schedule(
        schedule_id: i64,
        day: Option<&str>,
        route: &str,
        from: &str,
        to: &str,
    ) -> Schedule {
        Schedule {
            schedule_id,
            route_id: Some(1),
            route_name: route.to_string(),
            departure_station: from.to_string(),
            arrival_station: to.to_string(),
            departure_time: Some("08:00".into()),
            arrival_time: Some("08:30".into()),
            day_of_week: day.map(str::to_string),
            frequency: Some(15),
        }
    }

    fn delay(delay_id: i64, is_active: Option<bool>) -> Delay {
        Delay {
            delay_id,
            schedule_id: Some(1),
            route_name: Some("Crosstown".into()),
            departure_time: Some("08:00".into()),
            delay_minutes: 5,
            reason: None,
            reported_at: None,
            is_active,
            resolved_at: None,
        }
    }

    fn ids(schedules: Vec<&Schedule>) -> Vec<i64> {
        schedules.iter().map(|s| s.schedule_id).collect()
    }

    #[test]
    fn routes_match_any_text_field() {
        let routes = vec![
            route(1, "Crosstown", Some("City Transit"), "Airport"),
            route(2, "Night Owl", None, "Harbour"),
            route(3, "Harbour Loop", Some("Bayline"), "Central"),
        ];

        let found: Vec<i64> = filter_routes(&routes, "HARBOUR")
            .iter()
            .map(|r| r.route_id)
            .collect();
        assert_eq!(found, vec![2, 3]);

        let found: Vec<i64> = filter_routes(&routes, "bayline")
            .iter()
            .map(|r| r.route_id)
            .collect();
        assert_eq!(found, vec![3]);

        assert_eq!(filter_routes(&routes, "  ").len(), 3);
        assert!(filter_routes(&routes, "tram").is_empty());
    }

    #[test]
    fn stations_match_name_or_address() {
        let stations = vec![
            station(1, "Central", None),
            station(2, "Pier 4", Some("Harbour Road")),
        ];

        assert_eq!(filter_stations(&stations, "cen")[0].station_id, 1);
        assert_eq!(filter_stations(&stations, "bour")[0].station_id, 2);
        assert_eq!(filter_stations(&stations, "").len(), 2);
    }

    #[test]
    fn schedules_filter_by_day_name_or_abbreviation() {
        let schedules = vec![
            schedule(1, Some("Monday"), "Crosstown", "Central", "Airport"),
            schedule(2, Some("tuesday"), "Crosstown", "Central", "Airport"),
            schedule(3, None, "Crosstown", "Central", "Airport"),
            schedule(4, Some("Weekend"), "Crosstown", "Central", "Airport"),
        ];

        assert_eq!(ids(filter_schedules_by_day(&schedules, Some("monday"))), vec![1]);
        assert_eq!(ids(filter_schedules_by_day(&schedules, Some("Tue"))), vec![2]);

        // Non-weekday labels still match literally
        assert_eq!(ids(filter_schedules_by_day(&schedules, Some("weekend"))), vec![4]);

        assert_eq!(filter_schedules_by_day(&schedules, None).len(), 4);
        assert_eq!(filter_schedules_by_day(&schedules, Some("")).len(), 4);
    }

    #[test]
    fn schedules_filter_by_route_or_station_text() {
        let schedules = vec![
            schedule(1, Some("Monday"), "Crosstown", "Central", "Airport"),
            schedule(2, Some("Monday"), "Harbour Loop", "Central", "Pier 4"),
            schedule(3, Some("Friday"), "Night Owl", "Harbour", "Central"),
        ];

        assert_eq!(ids(filter_schedules(&schedules, None, "HARBOUR")), vec![2, 3]);
        assert_eq!(ids(filter_schedules(&schedules, None, "airport")), vec![1]);
        assert_eq!(ids(filter_schedules(&schedules, None, "pier")), vec![2]);

        // Day and text narrow together
        assert_eq!(
            ids(filter_schedules(&schedules, Some("Monday"), "harbour")),
            vec![2]
        );
        assert!(filter_schedules(&schedules, Some("Friday"), "airport").is_empty());

        assert_eq!(filter_schedules(&schedules, None, " ").len(), 3);
    }

    #[test]
    fn only_explicitly_active_delays() {
        let delays = vec![delay(1, Some(true)), delay(2, Some(false)), delay(3, None)];
        let found: Vec<i64> = active_delays(&delays).iter().map(|d| d.delay_id).collect();
        assert_eq!(found, vec![1]);
    }
}
