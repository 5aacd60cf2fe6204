use comfy_table::{presets::NOTHING, *};

use evready::{
    country::CountryMetrics,
    dataset::DatasetInfo,
    gap::GapCategory,
    stats::{Metric, SummaryStats},
};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    table
}

fn headed_table(headers: Vec<&str>) -> Table {
    let mut table = base_table();
    table
        .set_header(
            headers
                .into_iter()
                .map(|header| Cell::new(header).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        )
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─');
    table
}

fn format_eiri(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.1}")
    }
}

fn format_metric(metric: Metric, country: &CountryMetrics) -> String {
    match metric {
        Metric::Stations => country.stations.to_string(),
        Metric::GapValue => format!("{:+.1}", country.gap_value),
        _ => format!("{:.1}", metric.value(country)),
    }
}

pub fn display_summary(info: &DatasetInfo, stats: &SummaryStats) {
    let mut table = base_table();
    table
        .add_row(vec![
            Cell::new("Release").add_attribute(Attribute::Bold),
            info.name.clone().into(),
        ])
        .add_row(vec![
            Cell::new("Reference year").add_attribute(Attribute::Bold),
            info.reference_year.to_string().into(),
        ]);
    if let Some(snapshot_date) = info.snapshot_date {
        table.add_row(vec![
            Cell::new("Snapshot date").add_attribute(Attribute::Bold),
            snapshot_date.to_string().into(),
        ]);
    }
    table
        .add_row(vec![
            Cell::new("Countries").add_attribute(Attribute::Bold),
            stats.country_count.to_string().into(),
        ])
        .add_row(vec![
            Cell::new("Total stations").add_attribute(Attribute::Bold),
            stats.total_stations.to_string().into(),
        ])
        .add_row(vec![
            Cell::new("Average EIRI").add_attribute(Attribute::Bold),
            format_eiri(stats.average_eiri).into(),
        ])
        .add_row(vec![
            Cell::new("Readiness leader").add_attribute(Attribute::Bold),
            stats
                .readiness_leader
                .map(|country| {
                    format!("{} ({})", country.display_name(), format_eiri(country.eiri))
                })
                .unwrap_or_default()
                .into(),
        ])
        .add_row(vec![
            Cell::new("Highest gap").add_attribute(Attribute::Bold),
            stats
                .highest_gap
                .map(|country| format!("{} ({:+.1})", country.display_name(), country.gap_value))
                .unwrap_or_default()
                .into(),
        ]);

    let column = table.column_mut(0).unwrap();
    column.set_cell_alignment(CellAlignment::Right);

    println!("\n{}", table);
}

pub fn display_rank(view: &[&CountryMetrics], metric: Metric) {
    let mut table = headed_table(vec!["#", "Country", metric.label()]);
    for (position, country) in view.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            country.display_name().to_string(),
            format_metric(metric, country),
        ]);
    }
    println!("\n{}", table);
}

pub fn display_table(view: &[&CountryMetrics]) {
    let mut table = headed_table(vec![
        "Code", "Country", "Stations", "Median kW", "EIRI", "Band", "Gap", "Cluster",
    ]);
    for country in view {
        table.add_row(vec![
            country.country_code.clone(),
            country.display_name().to_string(),
            country.stations.to_string(),
            format!("{:.0}", country.median_power_kw),
            format!("{:.1}", country.eiri),
            country.band().to_string(),
            format!("{:+.1}", country.gap_value),
            country.cluster.to_string(),
        ]);
    }
    println!("\n{}", table);
}

pub fn display_gap(view: &[&CountryMetrics]) {
    let mut table = headed_table(vec!["Code", "Country", "Stations", "Gap", "Bucket"]);
    for country in view {
        table.add_row(vec![
            country.country_code.clone(),
            country.display_name().to_string(),
            country.stations.to_string(),
            format!("{:+.1}", country.gap_value),
            GapCategory::of(country.gap_value).label().to_string(),
        ]);
    }
    println!("\n{}", table);
}

pub fn display_census(census: &[(GapCategory, usize)]) {
    let mut table = headed_table(vec!["Bucket", "Countries"]);
    for (category, count) in census {
        table.add_row(vec![category.label().to_string(), count.to_string()]);
    }
    println!("\n{}", table);
}

pub fn display_countries(view: &[&CountryMetrics]) {
    let mut table = headed_table(vec!["Code", "Country", "EIRI", "Band"]);
    for country in view {
        table.add_row(vec![
            country.country_code.clone(),
            country.display_name().to_string(),
            format!("{:.1}", country.eiri),
            country.band().to_string(),
        ]);
    }
    println!("\n{}", table);
}
