use colored::Colorize;
use std::fmt;

pub fn info(message: impl fmt::Display) {
    println!("{} {}", "[i]".cyan(), message);
}

pub fn success(message: impl fmt::Display) {
    println!("{} {}", "[✓]".green(), message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{} {}", "[!]".yellow(), message);
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{} {}", "[x]".red(), message);
}

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}
