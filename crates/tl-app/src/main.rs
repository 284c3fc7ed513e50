//! Main application entry point

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tl_core::{resolve_window, Event, EventId, LayoutConfig, ViewState};
use tl_data::{ProjectStore, ProjectsRoot};
use tl_render::{render_scene, RecordingRenderer};
use tl_views::{compute_scene, DeferredCommits, DragCommit, DragController, Point, TimelineScene};

mod args;

use args::Args;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("failed to load layout config {}", path.display()))?,
        None => LayoutConfig::default(),
    };

    let mut store = match &args.project {
        Some(path) => ProjectStore::load(path)
            .with_context(|| format!("failed to open project {}", path.display()))?,
        None => {
            let root = ProjectsRoot::new(&args.root);
            info!(
                project = %root.current(),
                root = %root.root().display(),
                "opening current project"
            );
            root.open_current()?
        }
    };

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let view = build_view(args, store.events(), today);
    let mut scene = compute_scene(
        store.places(),
        store.characters(),
        store.events(),
        &view,
        &config,
    )?;

    if let Some((event, date)) = args.reschedule {
        let commit = reschedule(&mut store, &scene, event, date)?;
        store.save()?;
        info!(
            event = commit.event.0,
            start = %commit.new_start,
            end = ?commit.new_end,
            "event rescheduled"
        );
        scene = compute_scene(
            store.places(),
            store.characters(),
            store.events(),
            &view,
            &config,
        )?;
    }

    let mut renderer = RecordingRenderer::new();
    render_scene(&mut renderer, &scene, &config, None);
    info!(
        tier = ?scene.lod.tier,
        cards = scene.cards.len(),
        lanes = scene.lanes.len(),
        ticks = scene.ticks.len(),
        draw_commands = renderer.commands().len(),
        width = scene.content_width,
        height = scene.content_height,
        "scene ready"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scene.cards)?);
    } else {
        print_scene(&scene, store.events());
    }
    Ok(())
}

fn build_view(args: &Args, events: &[Event], today: NaiveDate) -> ViewState {
    let mut view = ViewState::new(today);
    view.zoom_factor = args.zoom;
    for place in &args.places {
        view.toggle_place(place);
    }
    for character in &args.characters {
        view.toggle_character(character);
    }
    if args.from.is_some() || args.to.is_some() {
        view.set_explicit_window(args.from, args.to);
    }

    let window = resolve_window(events, &view);
    let first_day = if window.from != NaiveDate::MIN {
        Some(window.from)
    } else {
        events.iter().filter_map(Event::start).min()
    };
    if let Some(first_day) = first_day {
        view.pan_to(first_day);
    }
    debug!(origin = %view.pan_origin, from = %window.from, to = %window.to, "view prepared");
    view
}

/// Drag the first card of `event` so that it starts on `date`
///
/// Goes through the same gesture path as an interactive host: grab, release
/// at the target day, queue the commit and apply it after the pass.
fn reschedule(
    store: &mut ProjectStore,
    scene: &TimelineScene,
    event: EventId,
    date: NaiveDate,
) -> Result<DragCommit> {
    let card = scene
        .cards_for_event(event)
        .next()
        .ok_or_else(|| anyhow!("event {} is not on the chart", event.0))?;
    let grab = Point::new(card.rect.x + 1.0, card.rect.center_y());

    let mut drag = DragController::new();
    drag.begin_drag(scene, card.id, grab)?;
    let commit = drag.commit_drag(Point::new(scene.mapper.date_to_x(date) + 1.0, grab.y))?;
    if commit.new_start != date {
        warn!(requested = %date, landed = %commit.new_start, "move was clamped to the lane");
    }

    let mut queue = DeferredCommits::new();
    queue.push(commit);
    store.apply_deferred(&mut queue);
    Ok(commit)
}

fn print_scene(scene: &TimelineScene, events: &[Event]) {
    for row in &scene.lanes {
        println!("{}", row.label);
        for card in scene.cards.iter().filter(|c| c.lane == row.lane) {
            let title = events.get(card.event.0).map_or("", |e| e.title.as_str());
            let mark = if card.style.dimmed { " (dimmed)" } else { "" };
            println!(
                "  {title:<28} {:<25} x={:>7.1} y={:>6.1} w={:>6.1}{mark}",
                card.fields.date_label, card.rect.x, card.rect.y, card.rect.width
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::parse_date;

    const PROJECT: &str = r##"{
        "characters": [{"name": "Alice", "color": "#EF4444"}],
        "places": [{"name": "Castle"}, {"name": "Forest"}],
        "events": [
            {"title": "Siege", "start_date": "2024-03-01", "end_date": "2024-03-03",
             "places": ["Castle"], "characters": ["Alice"]},
            {"title": "Hunt", "start_date": "2024-03-20", "places": ["Forest"]}
        ]
    }"##;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_view_starts_at_the_first_visible_day() {
        let store = ProjectStore::from_json_str(PROJECT).unwrap();
        let args = Args {
            zoom: 2.0,
            characters: vec!["Alice".into()],
            ..Args::default()
        };
        let view = build_view(&args, store.events(), date("2030-01-01"));
        assert_eq!(view.zoom_factor, 2.0);
        assert!(view.selected_characters.contains("Alice"));
        assert_eq!(view.pan_origin, date("2024-02-29"));
    }

    #[test]
    fn test_reschedule_moves_event_through_a_drag() {
        let mut store = ProjectStore::from_json_str(PROJECT).unwrap();
        let view = build_view(&Args::default(), store.events(), date("2030-01-01"));
        let config = LayoutConfig::default();
        let scene = compute_scene(
            store.places(),
            store.characters(),
            store.events(),
            &view,
            &config,
        )
        .unwrap();

        let commit = reschedule(&mut store, &scene, EventId(0), date("2024-03-10")).unwrap();
        assert_eq!(commit.new_start, date("2024-03-10"));
        assert_eq!(store.events()[0].start_date, "2024-03-10");
        assert_eq!(store.events()[0].end_date, "2024-03-12");
        assert!(store.is_dirty());

        assert!(reschedule(&mut store, &scene, EventId(9), date("2024-03-10")).is_err());
    }
}
