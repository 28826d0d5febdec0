//! Pet Connect server binary.
//! Run with: cargo run --bin pet-connect-server

use std::process::ExitCode;

use pet_connect::start_pet_connect;

fn main() -> ExitCode {
    start_pet_connect::run()
}
