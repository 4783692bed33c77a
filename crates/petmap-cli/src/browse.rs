//! Facility browsing commands: districts, filter, search and detail.
//!
//! `filter` and `search` drive the same orchestrator runtime the map UI
//! uses, with a [`ConsoleMap`] standing in for the widget.

use std::sync::Arc;

use anyhow::Context as _;
use petmap_app::{Action, AppState, Notice, Runtime, Store};
use petmap_client::ApiClient;
use petmap_core::{load_category_groups, AppConfig, CategoryGroups, CategoryKey, Facility, FacilityId};
use petmap_map::MapController;

use crate::console::{ConfigGeolocator, ConsoleMap};

type CliRuntime = Runtime<ApiClient, ConfigGeolocator, ConsoleMap>;

/// Options for `petmap filter`.
#[derive(Debug, Default)]
pub(crate) struct FilterOptions {
    pub district: Option<String>,
    pub near_me: bool,
    pub categories: Vec<CategoryKey>,
    pub query: Option<String>,
}

fn category_groups(config: &AppConfig) -> anyhow::Result<CategoryGroups> {
    match &config.categories_path {
        Some(path) => load_category_groups(path)
            .with_context(|| format!("loading category groups from {}", path.display())),
        None => Ok(CategoryGroups::default()),
    }
}

fn build_runtime(config: &AppConfig, client: Arc<ApiClient>) -> anyhow::Result<CliRuntime> {
    let store = Store::new(category_groups(config)?, config.search_origin);
    let map = MapController::new(
        ConsoleMap::default(),
        config.map_center,
        config.map_zoom,
        config.map_max_zoom,
    );
    Ok(Runtime::new(
        store,
        client,
        Arc::new(ConfigGeolocator::new(config.device_location)),
        map,
    ))
}

/// Prints pending notices to stderr. Fails when the user has to log in.
fn drain_notices(runtime: &mut CliRuntime) -> anyhow::Result<()> {
    for notice in runtime.take_notices() {
        if notice == Notice::AuthRequired {
            anyhow::bail!(notice.message());
        }
        eprintln!("{}", notice.message());
    }
    Ok(())
}

/// Rejects a `--district` the backend does not list. Skipped when the
/// district list could not be loaded.
pub(crate) fn ensure_known_district(state: &AppState, key: Option<&str>) -> anyhow::Result<()> {
    let Some(key) = key else {
        return Ok(());
    };
    if state.districts.is_empty() || state.district(key).is_some() {
        return Ok(());
    }
    let known: Vec<&str> = state.districts.iter().map(|d| d.key()).collect();
    anyhow::bail!("unknown district '{key}'; expected one of: {}", known.join(", "))
}

pub(crate) async fn run_districts(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let districts = client.districts().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&districts)?);
        return Ok(());
    }
    for district in &districts {
        let services = district.popular_services.as_deref().unwrap_or("");
        println!("{:<16} {:<8} {}", district.key(), district.name, services);
    }
    Ok(())
}

pub(crate) async fn run_filter(
    config: &AppConfig,
    client: Arc<ApiClient>,
    options: FilterOptions,
    json: bool,
) -> anyhow::Result<()> {
    let mut runtime = build_runtime(config, client)?;
    runtime.load_districts();
    runtime.settle().await;
    drain_notices(&mut runtime)?;

    ensure_known_district(runtime.state(), options.district.as_deref())?;

    if options.near_me {
        runtime.dispatch(Action::UseDeviceLocation);
    } else {
        runtime.dispatch(Action::SelectDistrict(options.district));
    }
    runtime.settle().await;
    drain_notices(&mut runtime)?;

    for key in options.categories {
        runtime.dispatch(Action::ToggleCategory(key));
    }
    if let Some(query) = options.query {
        runtime.dispatch(Action::SetQuery(query));
    }
    runtime.settle().await;
    drain_notices(&mut runtime)?;

    print_results(&runtime, json)
}

pub(crate) async fn run_search(
    config: &AppConfig,
    client: Arc<ApiClient>,
    query: String,
    json: bool,
) -> anyhow::Result<()> {
    let mut runtime = build_runtime(config, client)?;
    runtime.dispatch(Action::Search(query));
    runtime.settle().await;
    drain_notices(&mut runtime)?;
    print_results(&runtime, json)
}

pub(crate) async fn run_facility(client: &ApiClient, id: String, json: bool) -> anyhow::Result<()> {
    let facility = client.facility(&FacilityId::from(id)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&facility)?);
    } else {
        print_detail(&facility, chrono::Local::now().time());
    }
    Ok(())
}

fn print_results(runtime: &CliRuntime, json: bool) -> anyhow::Result<()> {
    let visible = runtime.store().visible();
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        if let Some(message) = runtime.store().empty_message() {
            println!("{message}");
        }
        return Ok(());
    }
    for facility in &visible {
        println!("{}", summary_line(facility));
    }

    let view = runtime.map().view();
    println!(
        "\n{} facilities, map centered at {} (zoom {})",
        visible.len(),
        view.center,
        view.zoom
    );
    Ok(())
}

pub(crate) fn summary_line(facility: &Facility) -> String {
    let mut line = format!(
        "{:<8} {:<12} {} ({})",
        facility.id,
        facility.category.as_str(),
        facility.name,
        facility.district
    );
    if let Some(km) = facility.distance_km {
        line.push_str(&format!(" {km:.1}km"));
    }
    line
}

fn print_detail(facility: &Facility, now: chrono::NaiveTime) {
    println!("{} [{}]", facility.name, facility.category);
    println!("  address: {}", facility.address);
    if let Some(phone) = &facility.phone {
        println!("  phone:   {phone}");
    }
    if let Some(website) = &facility.website {
        println!("  web:     {website}");
    }
    let hours = &facility.hours;
    if let (Some(opens), Some(closes)) = (&hours.opens, &hours.closes) {
        let open_now = match hours.is_open_at(now) {
            Some(true) => " (open now)",
            Some(false) => " (closed now)",
            None => "",
        };
        println!("  hours:   {opens}-{closes}{open_now}");
    } else if let Some(summary) = &hours.opening_hours {
        println!("  hours:   {summary}");
    }
    if let Some(holiday) = &hours.holiday_info {
        println!("  closed:  {holiday}");
    }
    if let Some(size) = &facility.pet_policy.size_limit {
        println!("  pets:    {size}");
    }
    if let Some(restrictions) = &facility.pet_policy.restrictions {
        println!("  rules:   {restrictions}");
    }
    if let Some(description) = &facility.description {
        println!("\n{description}");
    }
}
