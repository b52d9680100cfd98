use std::fmt::Display;

pub const RED: &str = "\x1B[1;31m";
pub const GRN: &str = "\x1B[1;32m";
pub const YEL: &str = "\x1B[1;33m";
pub const GRY: &str = "\x1B[1;30m";
pub const BLU: &str = "\x1B[1;94m";
pub const RESET: &str = "\x1B[0m";

fn emit<S: Display>(colour: &str, level: &str, msg: S) {
    eprintln!("[lispy] {}{}:{} {}", colour, level, RESET, msg);
}

#[allow(dead_code)]
pub fn error<S: Display>(msg: S) {
    emit(RED, "error", msg);
}

#[allow(dead_code)]
pub fn warn<S: Display>(msg: S) {
    emit(YEL, "warning", msg);
}

#[allow(dead_code)]
pub fn info<S: Display>(msg: S) {
    emit(GRN, "info", msg);
}

#[allow(dead_code)]
pub fn debug<S: Display>(msg: S) {
    emit(GRY, "DEBUG", msg);
}
