// Copyright (c) 2026 rezky_nightky

mod animation;
mod canvas;
mod color;
mod config;
mod controls;
mod drops;
mod frame;
mod interaction;
mod logging;
mod particles;
mod renderer;
mod runtime;
mod scheduler;
mod surface;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::Event;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::animation::Animation;
use crate::canvas::Canvas;
use crate::color::{background, parse_color};
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_keys, print_list_colors, Args,
    ColorBg,
};
use crate::controls::{Action, Controls};
use crate::frame::Frame;
use crate::interaction::pointer_from_mouse;
use crate::runtime::{ColorMode, Style, MAX_SPEED, MIN_SPEED};
use crate::scheduler::FrameLoop;
use crate::surface::{Surface, SurfaceRect};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// How long the loop sleeps on input while paused before re-checking
/// `--duration`.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Red))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))))
}

fn fail(name: &str, v: impl std::fmt::Display, why: &str) -> ! {
    eprintln!("failed to apply {} {} ({})", name, v, why);
    std::process::exit(1);
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        fail(name, v, "must be a finite number");
    }
    if v < min || v > max {
        fail(name, v, &format!("min {} max {}", min, max));
    }
    v
}

fn require_i64_range(name: &str, v: i64, min: i64, max: i64) -> i64 {
    if v < min || v > max {
        fail(name, v, &format!("min {} max {}", min, max));
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8) | Some(256) => ColorMode::Color256,
        Some(24) | Some(32) => ColorMode::TrueColor,
        Some(m) => fail("--colormode", m, "allowed: 0,16,8,256,24,32"),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

/// Canvas and click bounds for a terminal of `cols` x `rows`. A zero-sized
/// terminal has no surface yet.
fn build_surface(cols: u16, rows: u16, cell_px: f32) -> Option<Canvas> {
    if cols == 0 || rows == 0 {
        return None;
    }
    Some(Canvas::new(cols, rows, cell_px))
}

fn surface_bounds(canvas: Option<&Canvas>) -> SurfaceRect {
    let (w, h) = canvas.map_or((0.0, 0.0), |c| c.size());
    SurfaceRect::new(0.0, 0.0, w, h)
}

#[derive(Default)]
struct PerfStats {
    opportunities: u64,
    ticks: u64,
    peak_particles: usize,
    work_sum_s: f64,
    work_max_s: f64,
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        println!();
        print_keys();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() { "(unset)" } else { &colorterm }
        );
        println!("  TERM: {}", if term.is_empty() { "(unset)" } else { &term });
        println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
        println!("  effective: {}", color_mode_label(detect_color_mode(&args)));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("LOVEFALL_BUILD"));
        let sha = env!("LOVEFALL_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let speed = require_i64_range("--speed", args.speed as i64, MIN_SPEED as i64, MAX_SPEED as i64);
    let fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let cell_size = require_f64_range("--cell-size", args.cell_size as f64, 8.0, 64.0) as f32;
    let max_particles =
        require_i64_range("--max-particles", args.max_particles as i64, 0, 100_000) as usize;
    let duration_s = args.duration.and_then(|s| {
        if !s.is_finite() {
            fail("--duration", s, "must be a finite number");
        }
        (s > 0.0).then(|| require_f64_range("--duration", s, 0.1, 86400.0))
    });
    let color = parse_color(&args.color).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let log_level = logging::parse_level(&args.log_level).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    logging::init(args.log_file.as_deref(), log_level)?;

    let color_mode = detect_color_mode(&args);
    let bg = background(
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
    );
    log::info!(
        "starting: speed {} color {} message {:?} fps {} cell {} cap {} mode {}",
        speed,
        color,
        args.message,
        fps,
        cell_size,
        max_particles,
        color_mode_label(color_mode)
    );

    let mut controls = Controls::new(
        Style::new(speed as i32, color, args.message.clone()),
        !args.paused,
        !args.no_hud,
        args.screensaver,
    );

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut canvas = build_surface(w, h, cell_size);
    let mut frame = Frame::new(w, h, bg);

    let mut animation = Animation::new(cell_size, max_particles);
    animation.set_animating(controls.is_animating());
    animation.resize(surface_bounds(canvas.as_ref()));

    let start = Instant::now();
    let end_time = duration_s.map(|s| start + Duration::from_secs_f64(s));
    let mut frame_loop = FrameLoop::new(fps);
    if animation.is_animating() {
        frame_loop.start(start);
    }

    let mut stats = PerfStats::default();
    let mut running = true;
    let mut needs_present = true;

    while running {
        let mut pending_resize: Option<(u16, u16)> = None;

        // Block on input until the next frame opportunity (or forever, in
        // short slices, while paused).
        loop {
            let now = Instant::now();
            if end_time.is_some_and(|end| now >= end) {
                running = false;
                break;
            }
            if frame_loop.is_due(now) || pending_resize.is_some() || needs_present {
                break;
            }
            let mut timeout = frame_loop
                .deadline()
                .map_or(IDLE_POLL, |at| at.saturating_duration_since(now));
            if let Some(end) = end_time {
                timeout = timeout.min(end.saturating_duration_since(now));
            }
            if !Terminal::poll_event(timeout)? {
                continue;
            }

            match Terminal::read_event()? {
                Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                Event::Mouse(m) => {
                    if let Some(p) = pointer_from_mouse(&m, cell_size) {
                        animation.click(p);
                    }
                }
                Event::Key(k) => match controls.handle_key(k) {
                    Action::None => {}
                    Action::Quit => {
                        running = false;
                        break;
                    }
                    Action::Redraw => needs_present = true,
                    Action::Reset => {
                        animation.reset();
                        if let Some(c) = canvas.as_mut() {
                            c.clear();
                        }
                        needs_present = true;
                    }
                    Action::ToggleAnimation => {
                        animation.set_animating(controls.is_animating());
                        if controls.is_animating() {
                            frame_loop.start(Instant::now());
                        } else {
                            frame_loop.cancel();
                        }
                        needs_present = true;
                    }
                },
                _ => {}
            }
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            canvas = build_surface(nw, nh, cell_size);
            frame = Frame::new(nw, nh, bg);
            animation.resize(surface_bounds(canvas.as_ref()));
            needs_present = true;
            log::debug!("terminal resized to {}x{}", nw, nh);
        }

        let now = Instant::now();
        if frame_loop.is_due(now) {
            stats.opportunities += 1;
            let work_start = Instant::now();
            if animation.frame(now.duration_since(start), canvas.as_mut(), controls.style()) {
                stats.ticks += 1;
                stats.peak_particles = stats.peak_particles.max(animation.particles().len());
                needs_present = true;
            }
            let work_s = work_start.elapsed().as_secs_f64();
            stats.work_sum_s += work_s;
            stats.work_max_s = stats.work_max_s.max(work_s);

            if animation.is_animating() {
                frame_loop.reschedule(now);
            } else {
                frame_loop.cancel();
            }
        }

        if needs_present {
            if let Some(c) = canvas.as_ref() {
                c.present(&mut frame, color_mode, bg);
            }
            controls.draw_hud(&mut frame, color_mode, bg);
            if frame.has_changes() {
                term.draw(&mut frame)?;
            }
            needs_present = false;
        }
    }

    drop(term);
    log::info!(
        "stopped after {} ticks ({} frame opportunities)",
        animation.ticks(),
        stats.opportunities
    );
    logging::flush();

    if args.perf_stats {
        let elapsed_s = start.elapsed().as_secs_f64().max(0.000_001);
        let opportunities = stats.opportunities.max(1) as f64;
        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  frame_opportunities: {}", stats.opportunities);
        println!("  ticks: {}", stats.ticks);
        println!("  avg_ticks_per_s: {:.3}", stats.ticks as f64 / elapsed_s);
        println!("  avg_work_ms: {:.3}", stats.work_sum_s / opportunities * 1000.0);
        println!("  max_work_ms: {:.3}", stats.work_max_s * 1000.0);
        println!("  peak_particles: {}", stats.peak_particles);
    }

    Ok(())
}
