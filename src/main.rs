#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod command;
mod error;
mod modes;
mod process;
mod resolver;
mod settings;
mod supervisor;
mod ui;

fn main() {
    ui::run();
}
