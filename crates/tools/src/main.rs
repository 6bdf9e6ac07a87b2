use std::env;
use std::fs;

use scene::camera::Orientation;
use scene::config::EngineConfig;
use scene::markers::{MarkerProjector, markers_from_json_str};
use scene::placement::PlacementService;
use scene::projection::{ScreenPoint, Viewport};
use serde_json::json;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "defaults" => cmd_defaults(),
        "project" => cmd_project(args),
        "place" => cmd_place(args),
        _ => Err(usage()),
    }
}

fn cmd_defaults() -> Result<(), String> {
    let config = EngineConfig::default();
    let text = serde_json::to_string_pretty(&config).map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}

fn cmd_project(args: Vec<String>) -> Result<(), String> {
    // pano project <markers.json> [--radius R]
    let mut marker_path: Option<String> = None;
    let mut radius: Option<f64> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--radius" => {
                i += 1;
                radius = Some(parse_f64(&args, i, "--radius")?);
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => {
                if marker_path.is_some() {
                    return Err(usage());
                }
                marker_path = Some(args[i].clone());
            }
        }
        i += 1;
    }

    let Some(path) = marker_path else {
        return Err("project requires a marker file".to_string());
    };
    let radius = radius.unwrap_or(EngineConfig::default().sphere_radius);

    let payload = fs::read_to_string(&path).map_err(|e| format!("read {path}: {e}"))?;
    let markers = markers_from_json_str(&payload).map_err(|e| e.to_string())?;

    let mut projector = MarkerProjector::new(radius);
    projector.project(&markers);

    let out: Vec<_> = projector
        .points()
        .map(|(id, p)| json!({"id": id, "x": p.x, "y": p.y, "z": p.z}))
        .collect();
    let text =
        serde_json::to_string_pretty(&out).map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}

fn cmd_place(args: Vec<String>) -> Result<(), String> {
    // pano place <x> <y> --viewport WxH [--yaw Y] [--pitch P] [--zoom Z] [--radius R]
    if args.len() < 2 {
        return Err(usage());
    }

    let x_px: f64 = args[0]
        .parse()
        .map_err(|_| format!("bad x: {}", args[0]))?;
    let y_px: f64 = args[1]
        .parse()
        .map_err(|_| format!("bad y: {}", args[1]))?;

    let defaults = EngineConfig::default();
    let mut viewport: Option<Viewport> = None;
    let mut yaw = 0.0;
    let mut pitch = 0.0;
    let mut zoom = defaults.default_zoom_deg;
    let mut radius = defaults.sphere_radius;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--viewport" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--viewport requires WxH".to_string())?;
                let (w, h) = value
                    .split_once('x')
                    .ok_or_else(|| format!("bad viewport: {value}"))?;
                let w: f64 = w.parse().map_err(|_| format!("bad viewport: {value}"))?;
                let h: f64 = h.parse().map_err(|_| format!("bad viewport: {value}"))?;
                viewport = Some(Viewport::new(w, h));
            }
            "--yaw" => {
                i += 1;
                yaw = parse_f64(&args, i, "--yaw")?;
            }
            "--pitch" => {
                i += 1;
                pitch = parse_f64(&args, i, "--pitch")?;
            }
            "--zoom" => {
                i += 1;
                zoom = parse_f64(&args, i, "--zoom")?;
            }
            "--radius" => {
                i += 1;
                radius = parse_f64(&args, i, "--radius")?;
            }
            s => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
        }
        i += 1;
    }

    let Some(viewport) = viewport else {
        return Err("place requires --viewport WxH".to_string());
    };

    let service = PlacementService::new(radius);
    let coord = service
        .place_at(
            ScreenPoint::new(x_px, y_px),
            viewport,
            Orientation::new(yaw, pitch, zoom),
        )
        .map_err(|e| e.to_string())?;

    let text = serde_json::to_string_pretty(&json!({
        "yaw": coord.yaw_deg,
        "pitch": coord.pitch_deg,
    }))
    .map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_f64(args: &[String], i: usize, flag: &str) -> Result<f64, String> {
    let value = args
        .get(i)
        .ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse()
        .map_err(|_| format!("bad value for {flag}: {value}"))
}

fn usage() -> String {
    "usage:\n  \
     pano defaults\n  \
     pano project <markers.json> [--radius R]\n  \
     pano place <x> <y> --viewport WxH [--yaw Y] [--pitch P] [--zoom Z] [--radius R]"
        .to_string()
}
