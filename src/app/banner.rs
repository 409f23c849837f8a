use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

use crate::domain::RunConfig;

const HEADING_COLOR: Color = Color::Cyan;

/// Describes the run before it starts.
pub(crate) fn banner_lines(config: &RunConfig) -> Vec<String> {
    let mut lines = vec![
        format!("hyperload v{}", env!("CARGO_PKG_VERSION")),
        String::new(),
        "System Configuration:".to_owned(),
        format!("  CPU Cores:       {}", cpu_cores()),
        format!(
            "  Platform:        {} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        ),
        String::new(),
        "Test Configuration:".to_owned(),
        format!("  Target URL:      {}", config.url),
        format!("  Method:          {}", config.method),
        format!("  Virtual Users:   {}", config.vus.get()),
        format!("  Duration:        {:?}", config.duration),
        format!("  Requests/VU:     {}", config.requests_per_user.get()),
        format!("  Total Requests:  {}", config.planned_requests()),
    ];
    if config.enforce_requests {
        lines.push("  Request Cap:     enforced".to_owned());
    }
    if !config.headers.is_empty() {
        lines.push("  Custom Headers:".to_owned());
        lines.extend(
            config
                .headers
                .iter()
                .map(|(key, value)| format!("    {}: {}", key, value)),
        );
    }
    lines.push(String::new());
    lines
}

/// Prints the run header. Goes to stderr when stdout carries a JSON report.
pub(crate) fn print_banner(config: &RunConfig, no_color: bool, to_stderr: bool) {
    let use_color = !no_color
        && if to_stderr {
            std::io::stderr().is_terminal()
        } else {
            std::io::stdout().is_terminal()
        };
    for line in banner_lines(config) {
        let heading = line.ends_with(':') && !line.starts_with(' ');
        let text = if use_color && heading {
            line.with(HEADING_COLOR).to_string()
        } else {
            line
        };
        if to_stderr {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

fn cpu_cores() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}
