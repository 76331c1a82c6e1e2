//! Dashboard layout.
//!
//! Pure functions from a [`DashboardSnapshot`] to a [`DashboardView`]; the
//! Discord layer only converts the view into an embed.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use super::dashboard_models::{
    DashboardSnapshot, DashboardTone, DashboardView, DownloadsSection, EmbedField,
    UptimeSummary, FIELD_VALUE_LIMIT,
};
use crate::core::config::DashboardConfig;
use crate::core::media::{format_count, LibrarySnapshot, ServerStatus};

pub const ONLINE_TITLE: &str = "Server is currently Online! :white_check_mark:";
pub const OFFLINE_TITLE: &str = "Server is currently Offline! :warning:";
pub const MAX_STREAMS_SHOWN: usize = 8;
pub const MAX_DOWNLOADS_SHOWN: usize = 4;

/// Offline timestamps are shown at UTC+1.
const DISPLAY_OFFSET_SECS: i32 = 3600;

pub fn build_view(
    snapshot: &DashboardSnapshot,
    config: &DashboardConfig,
    now: DateTime<Utc>,
) -> DashboardView {
    let (title, tone, fields) = match &snapshot.server.status {
        ServerStatus::Offline { since } => (
            OFFLINE_TITLE,
            DashboardTone::Offline,
            offline_fields(*since, snapshot.uptime.as_ref(), now),
        ),
        ServerStatus::Online { uptime } => (
            ONLINE_TITLE,
            DashboardTone::Online,
            online_fields(uptime, snapshot),
        ),
    };

    DashboardView {
        title: title.to_string(),
        tone,
        author_name: config.name.clone(),
        icon_url: non_empty(&config.icon_url),
        footer_text: "Last updated".to_string(),
        footer_icon_url: non_empty(&config.footer_icon_url),
        fields,
        timestamp: now,
    }
}

fn non_empty(url: &str) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

fn offline_fields(
    since: DateTime<Utc>,
    uptime: Option<&UptimeSummary>,
    now: DateTime<Utc>,
) -> Vec<EmbedField> {
    let mut fields = vec![EmbedField::code(
        "Offline since:",
        format!(
            "{}\n{}",
            format_offline_since(since),
            describe_offline_duration(now - since)
        ),
        false,
    )];

    if let Some(uptime) = uptime.filter(|u| u.has_recent_data) {
        fields.push(EmbedField::code("Uptime (24h)", &uptime.day, true));
        fields.push(EmbedField::code("Uptime (7 days)", &uptime.week, true));
        fields.push(EmbedField::code("Uptime (30 days)", &uptime.month, true));
    }

    fields
}

fn online_fields(uptime: &str, snapshot: &DashboardSnapshot) -> Vec<EmbedField> {
    let mut fields = vec![
        EmbedField::code("Server Uptime 🖥️", uptime, true),
        EmbedField::spacer(),
        EmbedField::spacer(),
    ];

    fields.extend(library_fields(&snapshot.server.libraries));
    fields.push(streams_field(&snapshot.server.streams));

    match &snapshot.downloads {
        Some(downloads) if !downloads.lines.is_empty() => {
            fields.extend(download_fields(downloads));
        }
        _ => fields.push(EmbedField::new(
            "Current Downloads:",
            "💤 *No active downloads currently*",
            false,
        )),
    }

    fields
}

fn library_fields(libraries: &LibrarySnapshot) -> Vec<EmbedField> {
    let mut fields = Vec::new();
    for stats in libraries.iter() {
        fields.push(EmbedField::code(
            format!("{} {}", stats.display_name, stats.emoji),
            format_count(stats.count),
            true,
        ));
        if stats.show_episodes {
            fields.push(EmbedField::code(
                format!("{} Episodes 📺", stats.display_name),
                format_count(stats.episodes),
                true,
            ));
        }
    }
    fields
}

/// Up to eight blocks, fewer if they would overflow one field.
fn streams_field(streams: &[String]) -> EmbedField {
    if streams.is_empty() {
        return EmbedField::new(
            "Current Streams:",
            "💤 *No active streams currently*",
            false,
        );
    }

    let total = streams.len();
    let mut shown: Vec<&str> = streams
        .iter()
        .take(MAX_STREAMS_SHOWN)
        .map(String::as_str)
        .collect();
    while shown.len() > 1 && shown.join(" ").chars().count() > FIELD_VALUE_LIMIT {
        shown.pop();
    }

    let mut name = format!("{total} current Stream{}:", plural(total as i64));
    if shown.len() < total {
        name.push_str(&format!(" (showing {} of {total})", shown.len()));
    }

    EmbedField::new(name, shown.join(" "), false)
}

fn download_fields(downloads: &DownloadsSection) -> Vec<EmbedField> {
    let count = downloads.total_count;
    vec![
        EmbedField::new(
            format!("{count} current Download{}:", plural(count as i64)),
            downloads.lines.join("\n"),
            false,
        ),
        EmbedField::code("Downloads 📥", &downloads.total_size, true),
        EmbedField::code("Free Space 💾", &downloads.free_space, true),
        EmbedField::code("Total Space 🗄️", &downloads.total_space, true),
    ]
}

/// Sum of `"<value> <KB|MB|GB>"` sizes. Anything else is skipped.
pub fn total_download_size<'a>(sizes: impl IntoIterator<Item = &'a str>) -> String {
    // Fold from +0.0: an empty `sum` of floats yields -0.0.
    let total_mb = sizes
        .into_iter()
        .filter_map(size_in_mb)
        .fold(0.0_f64, |acc, mb| acc + mb);

    if total_mb >= 1024.0 {
        format!("{:.2} GB", total_mb / 1024.0)
    } else {
        format!("{total_mb:.2} MB")
    }
}

fn size_in_mb(size: &str) -> Option<f64> {
    let mut parts = size.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    match unit {
        "KB" => Some(value / 1024.0),
        "MB" => Some(value),
        "GB" => Some(value * 1024.0),
        _ => None,
    }
}

/// `dd.mm.YYYY HH:MM` at UTC+1.
pub fn format_offline_since(since: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(DISPLAY_OFFSET_SECS) {
        Some(offset) => since.with_timezone(&offset).format("%d.%m.%Y %H:%M").to_string(),
        None => since.format("%d.%m.%Y %H:%M").to_string(),
    }
}

/// `"2 hours, 15 minutes ago"`, coarsest unit first, or `"Just now"`.
pub fn describe_offline_duration(elapsed: Duration) -> String {
    let elapsed = elapsed.max(Duration::zero());
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() % 24;
    let minutes = elapsed.num_minutes() % 60;

    let day_part = format!("{days} day{}", plural(days));
    let hour_part = format!("{hours} hour{}", plural(hours));
    let minute_part = format!("{minutes} minute{}", plural(minutes));

    if days > 0 {
        format!("{day_part}, {hour_part}, {minute_part} ago")
    } else if hours > 0 {
        format!("{hour_part}, {minute_part} ago")
    } else if minutes > 0 {
        format!("{minute_part} ago")
    } else {
        "Just now".to_string()
    }
}

fn plural(count: i64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::dashboard_models::BLANK;
    use crate::core::media::{LibraryStats, ServerSnapshot};
    use chrono::TimeZone;

    fn find_field<'a>(view: &'a DashboardView, name: &str) -> Option<&'a EmbedField> {
        view.fields.iter().find(|field| field.name == name)
    }

    fn field<'a>(view: &'a DashboardView, name: &str) -> &'a EmbedField {
        find_field(view, name).unwrap_or_else(|| panic!("no field named {name:?}"))
    }

    fn config() -> DashboardConfig {
        DashboardConfig {
            name: "Media Hub".to_string(),
            icon_url: "https://example.com/icon.png".to_string(),
            footer_icon_url: String::new(),
        }
    }

    fn online_snapshot(streams: Vec<String>) -> DashboardSnapshot {
        let mut shows = LibraryStats::unconfigured("TV Shows", 120);
        shows.display_name = "Series".to_string();
        shows.emoji = "📺".to_string();
        shows.show_episodes = true;
        shows.episodes = 4800;

        DashboardSnapshot {
            server: ServerSnapshot {
                status: ServerStatus::Online {
                    uptime: "12:34".to_string(),
                },
                libraries: LibrarySnapshot::new(vec![
                    LibraryStats::unconfigured("Movies", 1500),
                    shows,
                ]),
                session_count: streams.len(),
                streams,
                secondary_stream_count: 0,
            },
            downloads: None,
            uptime: None,
        }
    }

    fn offline_snapshot(since: DateTime<Utc>, uptime: Option<UptimeSummary>) -> DashboardSnapshot {
        DashboardSnapshot {
            server: ServerSnapshot {
                status: ServerStatus::Offline { since },
                libraries: LibrarySnapshot::default(),
                streams: Vec::new(),
                session_count: 0,
                secondary_stream_count: 0,
            },
            downloads: None,
            uptime,
        }
    }

    fn uptime(has_recent_data: bool) -> UptimeSummary {
        UptimeSummary {
            day: "99.5% (23h 52m)".to_string(),
            week: "No data".to_string(),
            month: "No data".to_string(),
            has_recent_data,
        }
    }

    #[test]
    fn download_sizes_are_normalized() {
        assert_eq!(total_download_size(["512 KB", "1 MB", "2 GB"]), "2.00 GB");
        assert_eq!(total_download_size(["Unknown", "300 MB", "1.5 TB", "x MB"]), "300.00 MB");
        assert_eq!(total_download_size(Vec::<&str>::new()), "0.00 MB");
    }

    #[test]
    fn unparseable_sizes_total_zero() {
        assert_eq!(total_download_size(["Unknown", "Unknown"]), "0.00 MB");
    }

    #[test]
    fn offline_duration_phrasing() {
        assert_eq!(describe_offline_duration(Duration::zero()), "Just now");
        assert_eq!(describe_offline_duration(Duration::seconds(59)), "Just now");
        assert_eq!(describe_offline_duration(Duration::minutes(1)), "1 minute ago");
        assert_eq!(
            describe_offline_duration(Duration::minutes(135)),
            "2 hours, 15 minutes ago"
        );
        assert_eq!(
            describe_offline_duration(Duration::hours(25) + Duration::minutes(1)),
            "1 day, 1 hour, 1 minute ago"
        );
        assert_eq!(describe_offline_duration(Duration::minutes(-5)), "Just now");
    }

    #[test]
    fn offline_since_is_shown_at_utc_plus_one() {
        let since = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        assert_eq!(format_offline_since(since), "10.03.2024 00:30");
    }

    #[test]
    fn offline_view_without_recent_uptime() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        let since = now - Duration::minutes(135);
        let view = build_view(&offline_snapshot(since, Some(uptime(false))), &config(), now);

        assert_eq!(view.title, OFFLINE_TITLE);
        assert_eq!(view.tone, DashboardTone::Offline);
        assert_eq!(view.fields.len(), 1);
        assert_eq!(
            view.fields[0].value,
            "```10.03.2024 00:45\n2 hours, 15 minutes ago```"
        );
    }

    #[test]
    fn offline_view_with_uptime_history() {
        let now = Utc::now();
        let view = build_view(&offline_snapshot(now, Some(uptime(true))), &config(), now);
        let names: Vec<&str> = view.fields.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["Offline since:", "Uptime (24h)", "Uptime (7 days)", "Uptime (30 days)"]
        );
        assert_eq!(view.fields[1].value, "```99.5% (23h 52m)```");
        assert_eq!(view.fields[2].value, "```No data```");
    }

    #[test]
    fn online_view_layout() {
        let now = Utc::now();
        let view = build_view(&online_snapshot(vec!["a".to_string()]), &config(), now);

        assert_eq!(view.title, ONLINE_TITLE);
        assert_eq!(view.tone, DashboardTone::Online);
        assert_eq!(view.author_name, "Media Hub");
        assert_eq!(view.icon_url.as_deref(), Some("https://example.com/icon.png"));
        assert_eq!(view.footer_icon_url, None);
        assert_eq!(view.footer_text, "Last updated");

        assert_eq!(view.fields[0].value, "```12:34```");
        assert_eq!(view.fields[1].name, BLANK);
        assert_eq!(view.fields[2].name, BLANK);
        assert_eq!(field(&view, "Movies 🎬").value, "```1.500```");
        assert_eq!(field(&view, "Series 📺").value, "```120```");
        assert_eq!(field(&view, "Series Episodes 📺").value, "```4.800```");
        assert_eq!(field(&view, "1 current Stream:").value, "a");
        assert_eq!(
            field(&view, "Current Downloads:").value,
            "💤 *No active downloads currently*"
        );
    }

    #[test]
    fn empty_stream_list_has_idle_field() {
        let view = build_view(&online_snapshot(Vec::new()), &config(), Utc::now());
        assert_eq!(
            field(&view, "Current Streams:").value,
            "💤 *No active streams currently*"
        );
    }

    #[test]
    fn streams_are_capped_at_eight() {
        let streams: Vec<String> = (1..=10).map(|i| format!("s{i}")).collect();
        let view = build_view(&online_snapshot(streams), &config(), Utc::now());
        let field = field(&view, "10 current Streams: (showing 8 of 10)");

        assert_eq!(field.value, "s1 s2 s3 s4 s5 s6 s7 s8");
        assert!(!field.inline);
    }

    #[test]
    fn streams_are_trimmed_to_field_limit() {
        let streams: Vec<String> = (0..3).map(|i| format!("{i}").repeat(400)).collect();
        let view = build_view(&online_snapshot(streams), &config(), Utc::now());
        let field = field(&view, "3 current Streams: (showing 2 of 3)");

        assert!(field.value.chars().count() <= FIELD_VALUE_LIMIT);
    }

    #[test]
    fn downloads_section_adds_four_fields() {
        let mut snapshot = online_snapshot(Vec::new());
        snapshot.downloads = Some(DownloadsSection {
            lines: vec!["one".to_string(), "two".to_string()],
            total_count: 6,
            total_size: "2.00 GB".to_string(),
            free_space: "120 GB".to_string(),
            total_space: "2 TB".to_string(),
        });
        let view = build_view(&snapshot, &config(), Utc::now());

        assert_eq!(field(&view, "6 current Downloads:").value, "one\ntwo");
        assert_eq!(field(&view, "Downloads 📥").value, "```2.00 GB```");
        assert_eq!(field(&view, "Free Space 💾").value, "```120 GB```");
        assert_eq!(field(&view, "Total Space 🗄️").value, "```2 TB```");
        assert!(find_field(&view, "Current Downloads:").is_none());
    }
}
