//! Draw demo: runs a handful of draw commands through the scheduler.
//!
//! Usage: cargo run --release --bin draw_demo -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Draw config JSON (default: draw_config.json, defaults if missing)
//!   --size <N>        Map side length in blocks (default: 128)
//!   --seed <SEED>     Seed for the random and cloudy brushes (default: 12345)

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use voxdraw::core::types::{IVec3, Result};
use voxdraw::core::{logging, DrawConfig};
use voxdraw::draw::brush::PasteMode;
use voxdraw::draw::shapes::{Cuboid, Ellipsoid, Line};
use voxdraw::draw::{BrushManager, DrawOpHandle, DrawOperation, DrawScheduler, DrawShape};
use voxdraw::player::{Player, PlayerContext};
use voxdraw::voxel::{Block, Map, World};

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(e) = run().await {
        log::error!("Draw demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config").unwrap_or_else(|| "draw_config.json".to_string());
    let size = parse_i32_arg(&args, "--size").unwrap_or(128);
    let seed = parse_u32_arg(&args, "--seed").unwrap_or(12345);

    let config = DrawConfig::load_or_default(&config_path)?;
    let world = Arc::new(World::new("demo", Map::new(size, size, size / 2)?).with_config(config.clone()));
    let player = Arc::new(Player::new("builder", &config));
    let brushes = BrushManager::with_builtin_brushes()?;
    log::info!("{}", brushes.help_text());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(DrawScheduler::from_config(&config).with_world(world.clone()).run(shutdown_rx));
    let start = Instant::now();

    let seed_arg = format!("seed={seed}");
    let seed_arg = seed_arg.as_str();
    let floor = size - 1;
    let commands = vec![
        command(Cuboid::solid(), "random", &["stone/4", "gravel", "dirt", seed_arg], [IVec3::ZERO, IVec3::new(floor, floor, 3)]),
        command(Cuboid::hollow(), "normal", &["brick", "glass"], [IVec3::new(10, 10, 4), IVec3::new(40, 30, 20)]),
        command(Ellipsoid::sphere(), "cloudy", &["white", "gray/2", seed_arg], [IVec3::new(80, 80, 30), IVec3::new(80, 80, 44)]),
        command(Line, "rainbow", &[], [IVec3::new(0, 0, 4), IVec3::new(floor, floor, size / 2 - 1)]),
        command(Cuboid::wireframe(), "checkered", &["black", "white"], [IVec3::new(50, 5, 4), IVec3::new(70, 25, 24)]),
    ];

    for (shape, brush_name, brush_args, marks) in commands {
        let brush_args: Vec<&str> = brush_args.iter().map(String::as_str).collect();
        let Some(brush) = brushes.make_brush(player.as_ref(), brush_name, &brush_args) else {
            continue;
        };
        let op = DrawOperation::from_boxed(shape, player.clone(), world.clone()).with_brush(brush);
        wait_for(submit(op, &marks)?).await;
    }

    // Move the hollow box, then put it back with an undo of the paste and the cut
    let cut = DrawOperation::cut(player.clone(), world.clone(), 0);
    wait_for(submit(cut, &[IVec3::new(10, 10, 4), IVec3::new(40, 30, 20)])?).await;
    if let Some(paste) = DrawOperation::paste(player.clone(), world.clone(), 0, PasteMode::Merge) {
        wait_for(submit(paste, &[IVec3::new(60, 60, 4)])?).await;
    }
    if let Some(undo) = DrawOperation::undo_last(player.clone(), world.clone()) {
        wait_for(submit(undo, &[])?).await;
    }

    shutdown_tx.send(true).ok();
    if let Err(e) = scheduler.await {
        log::error!("Scheduler task failed: {}", e);
    }

    for message in player.take_messages() {
        log::info!("[to {}] {}", player.name(), message.text);
    }
    let map = world.map();
    log::info!(
        "Done in {:.2}s: {} blocks drawn, {} of {} blocks are not air",
        start.elapsed().as_secs_f64(),
        player.blocks_drawn(),
        map.volume() - map.count(Block::Air),
        map.volume()
    );
    Ok(())
}

type Command = (Box<dyn DrawShape>, &'static str, Vec<String>, [IVec3; 2]);

fn command(shape: impl DrawShape + 'static, brush: &'static str, args: &[&str], marks: [IVec3; 2]) -> Command {
    (Box::new(shape), brush, args.iter().map(|a| a.to_string()).collect(), marks)
}

/// Prepare and queue an operation. `None` if the shape, brush or an observer refused it.
fn submit(mut op: DrawOperation, marks: &[IVec3]) -> Result<Option<DrawOpHandle>> {
    if !op.prepare(marks)? {
        return Ok(None);
    }
    op.begin()
}

async fn wait_for(handle: Option<DrawOpHandle>) {
    let Some(handle) = handle else { return };
    let mut last = 0;
    while !handle.is_done() {
        let percent = handle.percent_done();
        if percent >= last + 25 {
            log::info!("{}: {}%", handle.description(), percent);
            last = percent;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    parse_str_arg(args, flag).and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    parse_str_arg(args, flag).and_then(|s| s.parse().ok())
}
