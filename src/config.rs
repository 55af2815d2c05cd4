// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::color::PRESETS;
use crate::runtime::{DEFAULT_MESSAGE, DEFAULT_SPEED};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  lovefall --speed 10 --color '#ff69b4' --message 'Te Amo ❤️' --fps 60 --cell-size 18 --max-particles 2000 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn heading(text: &str) -> String {
    if color_enabled_stdout() {
        format!("\x1b[1;36m{}\x1b[0m", text)
    } else {
        text.to_string()
    }
}

pub fn default_params_usage_for_help() -> String {
    match DEFAULT_PARAMS_USAGE.split_once('\n') {
        Some((head, rest)) => format!("{}\n{}", heading(head), rest),
        None => DEFAULT_PARAMS_USAGE.to_string(),
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "lovefall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = DEFAULT_SPEED as i32,
        allow_negative_numbers = true,
        help_heading = "ANIMATION",
        help = "Ticks per second and fall speed (min 1 max 100)"
    )]
    pub speed: i32,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "#ff69b4",
        help_heading = "ANIMATION",
        help = "Text color: #RRGGBB or a preset name (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        short = 'm',
        long = "message",
        default_value = DEFAULT_MESSAGE,
        help_heading = "ANIMATION",
        help = "Falling message; empty falls back to \"Love\""
    )]
    pub message: String,

    #[arg(
        long = "paused",
        help_heading = "ANIMATION",
        help = "Start paused (space or p resumes)"
    )]
    pub paused: bool,

    #[arg(
        long = "cell-size",
        default_value_t = 18.0,
        help_heading = "ANIMATION",
        help = "Glyph cell size in surface pixels (min 8 max 64)"
    )]
    pub cell_size: f32,

    #[arg(
        long = "max-particles",
        default_value_t = crate::particles::DEFAULT_MAX_PARTICLES,
        help_heading = "ANIMATION",
        help = "Live burst particle cap, oldest evicted first (min 0 max 100000)"
    )]
    pub max_particles: usize,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "no-hud",
        help_heading = "APPEARANCE",
        help = "Start with the status line hidden (h toggles)"
    )]
    pub no_hud: bool,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Frame opportunities per second (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print frame statistics on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Append diagnostics to this file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "log-level",
        default_value = "info",
        help_heading = "GENERAL",
        help = "Log level for --log-file (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List color presets and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    let color = color_enabled_stdout();
    println!("{}", heading("AVAILABLE COLOR PRESETS:"));
    println!("NOTE: --color also accepts any #RRGGBB value.");
    println!();
    println!("VALUE        HEX");
    for (name, rgb) in PRESETS {
        if color {
            println!(
                "{:<12} {} \x1b[38;2;{};{};{}m\u{2588}\u{2588}\x1b[0m",
                name, rgb, rgb.r, rgb.g, rgb.b
            );
        } else {
            println!("{:<12} {}", name, rgb);
        }
    }
}

pub fn print_keys() {
    println!("{}", heading("KEYS:"));
    println!("  space, p        play / pause");
    println!("  up, down        speed +1 / -1");
    println!("  pgup, pgdn      speed +10 / -10");
    println!("  c, C            next / previous color preset");
    println!("  enter           edit message (enter saves, esc cancels)");
    println!("  r               reset rain and bursts");
    println!("  h               toggle status line");
    println!("  q, esc          quit");
    println!("  mouse click     particle burst");
}
