use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};
use worldbuild::{BuilderConfig, DEFAULT_ZOOM_INDEX, HttpWorldApi, WorldBuilder, ZOOM_LEVELS};
use worldproto::{AreaId, LinkId, MapId};

fn usage_and_exit() -> ! {
    eprintln!(
        "worldbuild_ctl\n\n\
USAGE:\n\
  worldbuild_ctl [--api URL] [--token T] [--zoom N] <command> [args...]\n\n\
ENV:\n\
  WORLDBUILD_API_URL       default http://127.0.0.1:8080/api\n\
  WORLDBUILD_API_TOKEN     bearer token (optional)\n\
  WORLDBUILD_DEFAULT_ZOOM  zoom index a map opens at (0..16, default 7)\n\n\
COMMANDS:\n\
  list-maps\n\
  show-map <map>\n\
  new-area <map> <x> <y> <name>\n\
  rename-area <map> <area> <name>\n\
  delete-area <map> <area>\n\
  link-areas <map> <from-area> <to-map> <to-area>\n\
  delete-link <map> <link>\n\
  zoom <map> <in|out> [steps]\n\
  list-shops\n\
  list-items\n\
  list-templates\n"
    );
    std::process::exit(2);
}

#[derive(Debug)]
struct Config {
    api_url: String,
    token: Option<String>,
    zoom: usize,
    cmd: String,
    rest: Vec<String>,
}

fn parse_args() -> Config {
    let mut api_url = std::env::var("WORLDBUILD_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());
    let mut token = std::env::var("WORLDBUILD_API_TOKEN").ok();
    let mut zoom: usize = std::env::var("WORLDBUILD_DEFAULT_ZOOM")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ZOOM_INDEX);

    let mut it = std::env::args().skip(1);
    let mut cmd: Option<String> = None;
    let mut rest = Vec::new();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--api" => api_url = it.next().unwrap_or_else(|| usage_and_exit()),
            "--token" => token = Some(it.next().unwrap_or_else(|| usage_and_exit())),
            "--zoom" => {
                zoom = it
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage_and_exit())
            }
            "-h" | "--help" => usage_and_exit(),
            _ => {
                cmd = Some(arg);
                rest.extend(it);
                break;
            }
        }
    }

    if zoom >= ZOOM_LEVELS.len() {
        usage_and_exit();
    }
    let Some(cmd) = cmd else { usage_and_exit() };
    Config {
        api_url,
        token,
        zoom,
        cmd,
        rest,
    }
}

fn map_arg(s: &str) -> MapId {
    MapId::parse(s).unwrap_or_else(|_| usage_and_exit())
}

fn area_arg(s: &str) -> AreaId {
    AreaId::parse(s).unwrap_or_else(|_| usage_and_exit())
}

fn print_json<T: serde::Serialize>(v: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

/// Make `map` primary or fail; the builder has already alerted on why.
async fn open_map(b: &WorldBuilder, map: &MapId) -> anyhow::Result<()> {
    if !b.load_maps().await || !b.select_map(map).await {
        anyhow::bail!("cannot open map {map}");
    }
    Ok(())
}

async fn primary_area(b: &WorldBuilder, id: &AreaId) -> anyhow::Result<worldproto::Area> {
    b.area(id)
        .await
        .with_context(|| format!("area {id} is not on this map"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,worldbuild=info".into()),
        )
        .with_target(false)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let mut api = HttpWorldApi::new(cfg.api_url.clone());
    if let Some(t) = cfg.token.clone() {
        api = api.with_token(t);
    }
    let alert = |msg: &str| eprintln!("error: {msg}");
    let b = WorldBuilder::with_config(
        Arc::new(api),
        Arc::new(alert),
        BuilderConfig {
            default_zoom_index: cfg.zoom,
        },
    );
    info!(api = %cfg.api_url, cmd = %cfg.cmd, "worldbuild_ctl");

    let rest = &cfg.rest;
    match cfg.cmd.as_str() {
        "list-maps" => {
            if !rest.is_empty() {
                usage_and_exit();
            }
            if !b.load_maps().await {
                anyhow::bail!("cannot list maps");
            }
            for m in b.maps().await {
                let id = m.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
                println!("{id}\t{}\t{}x{}", m.name, m.width, m.height);
            }
        }
        "show-map" => {
            let [map] = rest.as_slice() else {
                usage_and_exit()
            };
            open_map(&b, &map_arg(map)).await?;
            print_json(&serde_json::json!({
                "map": b.selected_map().await,
                "areas": b.areas().await,
                "links": b.links().await,
            }))?;
        }
        "new-area" => {
            let [map, x, y, name] = rest.as_slice() else {
                usage_and_exit()
            };
            let x: f64 = x.parse().unwrap_or_else(|_| usage_and_exit());
            let y: f64 = y.parse().unwrap_or_else(|_| usage_and_exit());
            open_map(&b, &map_arg(map)).await?;
            if !b.new_area(x, y).await {
                anyhow::bail!("cannot start an area on {map}");
            }
            b.update_area_draft(|a| a.name = name.clone()).await;
            let saved = b.save_area().await.context("area not saved")?;
            print_json(&saved)?;
        }
        "rename-area" => {
            let [map, area, name] = rest.as_slice() else {
                usage_and_exit()
            };
            open_map(&b, &map_arg(map)).await?;
            let current = primary_area(&b, &area_arg(area)).await?;
            b.edit_area(current).await;
            b.update_area_draft(|a| a.name = name.clone()).await;
            let saved = b.save_area().await.context("area not saved")?;
            print_json(&saved)?;
        }
        "delete-area" => {
            let [map, area] = rest.as_slice() else {
                usage_and_exit()
            };
            open_map(&b, &map_arg(map)).await?;
            let before = b.links().await.len();
            let current = primary_area(&b, &area_arg(area)).await?;
            if !b.delete_area(&current).await {
                anyhow::bail!("area {area} not deleted");
            }
            println!(
                "deleted area {area} and {} link(s)",
                before - b.links().await.len()
            );
        }
        "link-areas" => {
            let [map, from, to_map, to] = rest.as_slice() else {
                usage_and_exit()
            };
            open_map(&b, &map_arg(map)).await?;
            let from = primary_area(&b, &area_arg(from)).await?;
            let to_map = map_arg(to_map);
            let to = area_arg(to);
            if !b.load_data_for_link_editor(&to_map).await {
                anyhow::bail!("cannot load map {to_map}");
            }
            let target = b
                .link_editor_areas()
                .await
                .into_iter()
                .find(|a| a.id.as_ref() == Some(&to))
                .with_context(|| format!("area {to} is not on map {to_map}"))?;
            if !b.new_link_from(&from).await || !b.select_area(&target).await {
                anyhow::bail!("cannot link these areas");
            }
            let saved = b.save_link().await.context("link not saved")?;
            print_json(&saved)?;
        }
        "delete-link" => {
            let [map, link] = rest.as_slice() else {
                usage_and_exit()
            };
            open_map(&b, &map_arg(map)).await?;
            let id = LinkId::parse(link).unwrap_or_else(|_| usage_and_exit());
            let current = b
                .link(&id)
                .await
                .with_context(|| format!("link {id} is not on this map"))?;
            if !b.delete_link(&current).await {
                anyhow::bail!("link {id} not deleted");
            }
            println!("deleted link {id}");
        }
        "zoom" => {
            let (map, dir, steps) = match rest.as_slice() {
                [map, dir] => (map, dir, 1usize),
                [map, dir, n] => (map, dir, n.parse().unwrap_or_else(|_| usage_and_exit())),
                _ => usage_and_exit(),
            };
            open_map(&b, &map_arg(map)).await?;
            for _ in 0..steps {
                match dir.as_str() {
                    "in" => b.zoom_map_in().await,
                    "out" => b.zoom_map_out().await,
                    _ => usage_and_exit(),
                };
            }
            let z = b.zoom().await;
            println!(
                "index={} multiplier={} at_min={} at_max={}",
                z.index(),
                z.multiplier(),
                z.at_min_zoom(),
                z.at_max_zoom()
            );
        }
        "list-shops" => {
            if !rest.is_empty() {
                usage_and_exit();
            }
            if !b.load_shops().await {
                anyhow::bail!("cannot list shops");
            }
            for s in b.shops().await {
                let id = s.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
                println!("{id}\t{}\t{} product(s)", s.name, s.products.len());
                for p in &s.products {
                    println!("\t{}\t{}", p.description, p.price);
                }
            }
        }
        "list-items" => {
            if !rest.is_empty() {
                usage_and_exit();
            }
            if !b.load_items().await {
                anyhow::bail!("cannot list items");
            }
            for it in b.items().await {
                let id = it.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
                println!("{id}\t{}\t{}", it.name, it.aspects().join(","));
            }
        }
        "list-templates" => {
            if !rest.is_empty() {
                usage_and_exit();
            }
            if !b.load_templates().await {
                anyhow::bail!("cannot list templates");
            }
            for t in b.templates().await {
                let id = t.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
                println!("{id}\t{}", t.name);
            }
        }
        _ => usage_and_exit(),
    }

    Ok(())
}
