use owo_colors::OwoColorize;

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when the stream is a TTY.
fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_warn(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

/// Every fatal error leaves the process through here, so the prefix is fixed.
pub fn print_error(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "ERROR:".red().bold(), msg);
    } else {
        eprintln!("ERROR: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if stdout_is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// such as plan lines and compare reports which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
